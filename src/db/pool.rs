//! SQLite connection wrapper (one connection per unit of work).

use rusqlite::{Connection, Result};
use std::path::Path;
use std::time::Duration;

pub struct DbPool {
    pub conn: Connection,
}

impl DbPool {
    pub fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(Path::new(path))?;
        configure(&conn)?;
        Ok(Self { conn })
    }
}

// FK checks are off by default in SQLite; the events table relies on them.
// The busy timeout keeps concurrent registrar calls from failing fast while
// another connection holds the write lock.
fn configure(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.busy_timeout(Duration::from_secs(5))?;
    Ok(())
}
