use crate::ui::messages::success;
use rusqlite::{Connection, Error, OptionalExtension, Result};

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Check if a table exists.
fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt =
        conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([name], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

/// Create the `funcionarios` table.
fn create_funcionarios_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS funcionarios (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            emp        TEXT NOT NULL,
            nome       TEXT NOT NULL,
            deleted_at TEXT
        );
        "#,
    )?;
    Ok(())
}

/// Create the `ponto_batidas` table with the modern schema.
///
/// The UNIQUE (funcionario_id, dat, hora) index is load-bearing: it blocks a
/// second punch at the exact same clock time for the same employee-day even
/// when two writers race past the application-level conflict probe. Partial
/// over live rows so a soft-deleted punch frees its slot.
fn create_batidas_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS ponto_batidas (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            funcionario_id INTEGER NOT NULL,
            emp            TEXT NOT NULL,
            dat            TEXT NOT NULL,
            hora           TEXT NOT NULL,
            locacao_id     INTEGER,
            origem         TEXT NOT NULL DEFAULT 'mobile',
            lat            REAL,
            lng            REAL,
            endereco       TEXT,
            distancia_m    INTEGER,
            status         TEXT NOT NULL DEFAULT 'novo',
            justificativa  TEXT NOT NULL DEFAULT '',
            processo       TEXT NOT NULL,
            tip            TEXT CHECK(tip IN ('ent1','sai1','ent2','sai2','ext')),
            ori            TEXT NOT NULL DEFAULT '00:00',
            anexo          TEXT,
            created_at     TEXT NOT NULL,
            deleted_at     TEXT
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_batidas_func_dat_hora
            ON ponto_batidas(funcionario_id, dat, hora)
            WHERE deleted_at IS NULL;
        CREATE INDEX IF NOT EXISTS idx_batidas_func_dat
            ON ponto_batidas(funcionario_id, dat);
        "#,
    )?;
    Ok(())
}

/// Create the `ponto_eventos` table.
fn create_eventos_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS ponto_eventos (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            emp            TEXT NOT NULL,
            funcionario_id INTEGER NOT NULL REFERENCES funcionarios(id),
            tipo           TEXT NOT NULL CHECK(tipo IN
                ('JUSTIFICATIVA','ATESTADO','SISTEMA','APP','OUTRO','AFST','AJUSTE')),
            data_inicio    TEXT NOT NULL,
            data_fim       TEXT,
            motivo         TEXT NOT NULL DEFAULT '',
            observacao     TEXT NOT NULL DEFAULT '',
            anexo          TEXT,
            aprovacao      TEXT NOT NULL DEFAULT 'pendente'
                CHECK(aprovacao IN ('pendente','aprovado','rejeitado')),
            aprovador_id   INTEGER,
            aprovado_em    TEXT,
            created_at     TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_eventos_func ON ponto_eventos(funcionario_id);
        "#,
    )?;
    Ok(())
}

/// Add the `anexo` column to `ponto_batidas` (pre-0.3 schemas lack it).
fn migrate_add_anexo_column(conn: &Connection) -> Result<(), Error> {
    let version = "20250602_0007_add_anexo_to_batidas";

    // 1) Skip if already applied
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    if chk.query_row([version], |_| Ok(())).optional()?.is_some() {
        return Ok(());
    }

    // 2) Column probe via PRAGMA; ALTER TABLE has no IF NOT EXISTS
    let mut stmt = conn.prepare("PRAGMA table_info('ponto_batidas')")?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;
    let mut has_anexo = false;
    for c in cols {
        if c? == "anexo" {
            has_anexo = true;
            break;
        }
    }

    if !has_anexo {
        conn.execute("ALTER TABLE ponto_batidas ADD COLUMN anexo TEXT;", [])?;
    }

    // 3) Mark as applied
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, 'Added anexo to ponto_batidas')",
        [version],
    )?;

    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    // 1) Ensure log table
    ensure_log_table(conn)?;

    // 2) Base tables. funcionarios first: ponto_eventos references it.
    let fresh = !table_exists(conn, "ponto_batidas")?;

    create_funcionarios_table(conn)?;
    create_batidas_table(conn)?;
    create_eventos_table(conn)?;

    if fresh {
        success("Created ponto tables (modern schema).");
    }

    // 3) Incremental column migrations for databases created before 0.3
    migrate_add_anexo_column(conn)?;

    Ok(())
}
