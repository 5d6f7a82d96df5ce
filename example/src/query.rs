use serde::Deserialize;

use mybind::{Result, Statement, Value, query, types::Json};

use crate::transport::MemoryServer;

#[derive(Debug, Deserialize)]
struct UserMeta {
    role: String,
}

pub fn main() -> Result<()> {
    let mut conn = MemoryServer::users();

    // prepared statement, binary protocol
    let rows = query("SELECT id, name, active, created, meta FROM users", &mut conn)
        .fetch_all()?;
    for row in &rows {
        println!("{row:?}");
    }

    // typed extraction through the adapter layer
    let first = &rows[0];
    let id = first.try_get::<_, u64>("id")?;
    let name = first.try_get::<_, String>("name")?;
    let active = first.try_get::<_, bool>("active")?;
    let created = first.try_get::<_, time::PrimitiveDateTime>("created")?;
    let meta = first.try_get::<_, Json<UserMeta>>("meta")?;
    println!("#{id} {name} active={active} created={created} role={}", meta.0.role);

    // statement reuse with distinguished 64-bit parameters
    let mut stmt = Statement::prepare(&mut conn, "UPDATE users SET active = ? WHERE id = ?")?;
    let result = stmt.execute(&mut conn, &[Value::Bool(false), Value::UInt(1)])?;
    println!("affected {} rows", result.affected_rows);
    stmt.close(&mut conn);

    // ad-hoc text protocol, values spliced as escaped literals
    let rows = mybind::query::text("SELECT id, name, created FROM users WHERE name = ?", &mut conn)
        .bind("O'Brien")
        .fetch_all()?;
    for row in &rows {
        println!("{row:?}");
    }

    Ok(())
}
