//! A canned in-memory stand-in for the wire client library.
use std::collections::HashMap;

use mybind::{
    Column, Transport,
    bind::ResultBinds,
    encode::Encoded,
    mysql::{FieldType, MysqlTime, ServerError, TemporalKind},
    transport::{Fetch, StmtId, TextResult},
};

pub struct MemoryServer {
    columns: Vec<Column>,
    rows: Vec<Vec<Option<Vec<u8>>>>,
    stmts: HashMap<u32, String>,
    executing: Option<String>,
    cursor: usize,
    next_id: u32,
    affected: u64,
    insert: u64,
}

fn datetime(buf: &mut Vec<u8>, year: u32, month: u32, day: u32, hms: [u32; 3], micro: u32) {
    let t = MysqlTime {
        year,
        month,
        day,
        hour: hms[0],
        minute: hms[1],
        second: hms[2],
        microsecond: micro,
        offset: 0,
        negative: false,
        kind: TemporalKind::Datetime,
    };
    buf.resize(MysqlTime::SIZE, 0);
    t.write(buf);
}

impl MemoryServer {
    /// A `users` table with two rows.
    pub fn users() -> Self {
        let columns = vec![
            Column::new("id", FieldType::LongLong, 20).unsigned(),
            Column::new("name", FieldType::VarString, 16),
            Column::new("active", FieldType::Tiny, 1),
            Column::new("created", FieldType::Datetime, 26),
            Column::new("meta", FieldType::Json, 64),
        ];

        let mut created = Vec::new();
        datetime(&mut created, 2024, 3, 5, [13, 45, 9], 125_000);

        let rows = vec![
            vec![
                Some(1u64.to_le_bytes().to_vec()),
                Some(b"O'Brien".to_vec()),
                Some(vec![1]),
                Some(created.clone()),
                Some(br#"{"role":"admin"}"#.to_vec()),
            ],
            vec![
                Some(2u64.to_le_bytes().to_vec()),
                Some(b"Mallory".to_vec()),
                Some(vec![0]),
                Some(created),
                None,
            ],
        ];

        Self {
            columns,
            rows,
            stmts: HashMap::new(),
            executing: None,
            cursor: 0,
            next_id: 0,
            affected: 1,
            insert: 2,
        }
    }

    fn produces_rows(sql: &str) -> bool {
        sql.trim_start().to_ascii_uppercase().starts_with("SELECT")
    }
}

impl Transport for MemoryServer {
    fn prepare(&mut self, sql: &str) -> Result<(StmtId, u16), ServerError> {
        let id = StmtId(self.next_id);
        self.next_id += 1;
        self.stmts.insert(id.0, sql.into());
        let params = sql.bytes().filter(|b| *b == b'?').count() as u16;
        Ok((id, params))
    }

    fn stmt_execute(&mut self, stmt: StmtId, _params: &[Encoded]) -> Result<(), ServerError> {
        let sql = self
            .stmts
            .get(&stmt.0)
            .ok_or_else(|| ServerError::new(1243, "unknown prepared statement handler"))?;
        self.executing = Some(sql.clone());
        self.cursor = 0;
        Ok(())
    }

    fn stmt_columns(&mut self, _stmt: StmtId) -> Result<Vec<Column>, ServerError> {
        match self.executing.as_deref().is_some_and(Self::produces_rows) {
            true => Ok(self.columns.clone()),
            false => Ok(Vec::new()),
        }
    }

    fn stmt_fetch(
        &mut self,
        _stmt: StmtId,
        binds: &mut ResultBinds,
    ) -> Result<Fetch, ServerError> {
        let Some(row) = self.rows.get(self.cursor) else {
            return Ok(Fetch::Done);
        };
        for (i, cell) in row.iter().enumerate() {
            match cell {
                Some(data) => binds.write(i, data),
                None => binds.set_null(i),
            }
        }
        self.cursor += 1;
        Ok(Fetch::Row)
    }

    fn stmt_affected_rows(&mut self, _stmt: StmtId) -> u64 {
        self.affected
    }

    fn stmt_insert_id(&mut self, _stmt: StmtId) -> u64 {
        self.insert
    }

    fn stmt_free_result(&mut self, _stmt: StmtId) {
        self.cursor = 0;
    }

    fn stmt_close(&mut self, stmt: StmtId) {
        self.stmts.remove(&stmt.0);
    }

    fn query(&mut self, sql: &str) -> Result<Option<TextResult>, ServerError> {
        if !Self::produces_rows(sql) {
            return Ok(None);
        }
        // text protocol serves the same table, every cell as ascii
        Ok(Some(TextResult {
            columns: vec![
                Column::new("id", FieldType::LongLong, 20).unsigned(),
                Column::new("name", FieldType::VarString, 16),
                Column::new("created", FieldType::Datetime, 26),
            ],
            rows: vec![
                vec![
                    Some("1".into()),
                    Some("O'Brien".into()),
                    Some("2024-03-05 13:45:09.125000".into()),
                ],
                vec![Some("2".into()), Some("Mallory".into()), None],
            ],
        }))
    }

    fn affected_rows(&mut self) -> u64 {
        self.affected
    }

    fn insert_id(&mut self) -> u64 {
        self.insert
    }
}
