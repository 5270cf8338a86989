use crate::errors::{AppError, AppResult};
use crate::models::batida::Batida;
use crate::models::evento::{Aprovacao, PontoEvento};
use crate::models::funcionario::Funcionario;
use crate::models::tipo_batida::TipoBatida;
use crate::models::tipo_evento::TipoEvento;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::params;
use rusqlite::{Connection, Result, Row};

const FORMATO_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

fn parse_timestamp(col: &str, s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, FORMATO_TIMESTAMP).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidDate(format!("{col}: {s}"))),
        )
    })
}

pub fn map_batida_row(row: &Row) -> Result<Batida> {
    let dat_str: String = row.get("dat")?;
    let hora_str: String = row.get("hora")?;
    let processo_str: String = row.get("processo")?;

    let dat = NaiveDate::parse_from_str(&dat_str, "%Y-%m-%d").map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidDate(dat_str.clone())),
        )
    })?;

    let hora = NaiveTime::parse_from_str(&hora_str, "%H:%M").map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidTime(hora_str.clone())),
        )
    })?;

    let processo = parse_timestamp("processo", &processo_str)?;

    // tip is nullable: batch-reconciled punches have no ordinal role yet
    let tip = match row.get::<_, Option<String>>("tip")? {
        Some(s) => Some(TipoBatida::from_db_str(&s).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(AppError::InvalidPayload(format!("tip: {s}"))),
            )
        })?),
        None => None,
    };

    Ok(Batida {
        id: row.get("id")?,
        funcionario_id: row.get("funcionario_id")?,
        emp: row.get("emp")?,
        dat,
        hora,
        locacao_id: row.get("locacao_id")?,
        origem: row.get("origem")?,
        lat: row.get("lat")?,
        lng: row.get("lng")?,
        endereco: row.get("endereco")?,
        distancia_m: row.get("distancia_m")?,
        status: row.get("status")?,
        justificativa: row.get("justificativa")?,
        processo,
        tip,
        ori: row.get("ori")?,
        anexo: row.get("anexo")?,
        created_at: row.get("created_at")?,
        deleted_at: row.get("deleted_at")?,
    })
}

fn map_evento_row(row: &Row) -> Result<PontoEvento> {
    let tipo_str: String = row.get("tipo")?;
    let tipo = TipoEvento::from_db_str(&tipo_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidPayload(format!("tipo: {tipo_str}"))),
        )
    })?;

    let aprovacao_str: String = row.get("aprovacao")?;
    let aprovacao = Aprovacao::from_db_str(&aprovacao_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidPayload(format!("aprovacao: {aprovacao_str}"))),
        )
    })?;

    let data_inicio: String = row.get("data_inicio")?;
    let data_fim: Option<String> = row.get("data_fim")?;
    let aprovado_em: Option<String> = row.get("aprovado_em")?;

    Ok(PontoEvento {
        id: row.get("id")?,
        emp: row.get("emp")?,
        funcionario_id: row.get("funcionario_id")?,
        tipo,
        data_inicio: parse_timestamp("data_inicio", &data_inicio)?,
        data_fim: data_fim
            .map(|s| parse_timestamp("data_fim", &s))
            .transpose()?,
        motivo: row.get("motivo")?,
        observacao: row.get("observacao")?,
        anexo: row.get("anexo")?,
        aprovacao,
        aprovador_id: row.get("aprovador_id")?,
        aprovado_em: aprovado_em
            .map(|s| parse_timestamp("aprovado_em", &s))
            .transpose()?,
        created_at: row.get("created_at")?,
    })
}

fn map_funcionario_row(row: &Row) -> Result<Funcionario> {
    Ok(Funcionario {
        id: row.get("id")?,
        emp: row.get("emp")?,
        nome: row.get("nome")?,
        deleted_at: row.get("deleted_at")?,
    })
}

// ---------------------------------------------------------------------------
// ponto_batidas
// ---------------------------------------------------------------------------

/// Ledger window for reconciliation: every punch (all employees) whose date
/// falls within the last `dias` days, newest first.
pub fn load_batidas_janela(conn: &Connection, hoje: NaiveDate, dias: i64) -> AppResult<Vec<Batida>> {
    let limite = hoje - chrono::Duration::days(dias);

    let mut stmt = conn.prepare(
        "SELECT * FROM ponto_batidas
         WHERE dat >= ?1
         ORDER BY id DESC",
    )?;

    let rows = stmt.query_map([limite.format("%Y-%m-%d").to_string()], map_batida_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// One employee's punches within [de, ate], newest first. Soft-deleted rows
/// are included: sync clients receive the tombstone via deleted_at.
pub fn load_batidas_funcionario(
    conn: &Connection,
    funcionario_id: i64,
    de: NaiveDate,
    ate: NaiveDate,
) -> AppResult<Vec<Batida>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM ponto_batidas
         WHERE funcionario_id = ?1 AND dat >= ?2 AND dat <= ?3
         ORDER BY id DESC",
    )?;

    let rows = stmt.query_map(
        params![
            funcionario_id,
            de.format("%Y-%m-%d").to_string(),
            ate.format("%Y-%m-%d").to_string(),
        ],
        map_batida_row,
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// All live punches of one employee-day, ordered by clock time ascending.
/// This is the ordering the classifier's position recount runs over.
pub fn load_batidas_do_dia(
    conn: &Connection,
    funcionario_id: i64,
    dat: NaiveDate,
) -> AppResult<Vec<Batida>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM ponto_batidas
         WHERE funcionario_id = ?1 AND dat = ?2 AND deleted_at IS NULL
         ORDER BY hora ASC",
    )?;

    let rows = stmt.query_map(
        params![funcionario_id, dat.format("%Y-%m-%d").to_string()],
        map_batida_row,
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Exact-duplicate probe: same employee, same day, same wall clock time.
pub fn find_batida_exata(
    conn: &Connection,
    funcionario_id: i64,
    dat: NaiveDate,
    hora: NaiveTime,
) -> AppResult<Option<Batida>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM ponto_batidas
         WHERE funcionario_id = ?1 AND dat = ?2 AND hora = ?3 AND deleted_at IS NULL
         LIMIT 1",
    )?;

    let mut rows = stmt.query_map(
        params![
            funcionario_id,
            dat.format("%Y-%m-%d").to_string(),
            hora.format("%H:%M").to_string(),
        ],
        map_batida_row,
    )?;

    match rows.next() {
        Some(r) => Ok(Some(r?)),
        None => Ok(None),
    }
}

pub fn find_batida_por_id(conn: &Connection, id: i64) -> AppResult<Option<Batida>> {
    let mut stmt =
        conn.prepare("SELECT * FROM ponto_batidas WHERE id = ?1 AND deleted_at IS NULL")?;

    let mut rows = stmt.query_map([id], map_batida_row)?;

    match rows.next() {
        Some(r) => Ok(Some(r?)),
        None => Ok(None),
    }
}

pub fn count_batidas_do_dia(
    conn: &Connection,
    funcionario_id: i64,
    dat: NaiveDate,
) -> AppResult<usize> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM ponto_batidas
         WHERE funcionario_id = ?1 AND dat = ?2 AND deleted_at IS NULL",
        params![funcionario_id, dat.format("%Y-%m-%d").to_string()],
        |row| row.get(0),
    )?;
    Ok(n as usize)
}

pub fn insert_batida(conn: &Connection, b: &Batida) -> AppResult<Batida> {
    conn.execute(
        "INSERT INTO ponto_batidas
            (funcionario_id, emp, dat, hora, locacao_id, origem, lat, lng,
             endereco, distancia_m, status, justificativa, processo, tip, ori,
             anexo, created_at, deleted_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
        params![
            b.funcionario_id,
            b.emp,
            b.dat_str(),
            b.hora_str(),
            b.locacao_id,
            b.origem,
            b.lat,
            b.lng,
            b.endereco,
            b.distancia_m,
            b.status,
            b.justificativa,
            b.processo.format(FORMATO_TIMESTAMP).to_string(),
            b.tip.map(|t| t.to_db_str()),
            b.ori,
            b.anexo,
            b.created_at,
            b.deleted_at,
        ],
    )?;

    let mut inserida = b.clone();
    inserida.id = conn.last_insert_rowid();
    Ok(inserida)
}

/// Batched insert inside one transaction: the whole accepted set lands or
/// none of it does. Returns the number of rows written.
pub fn insert_batidas_lote(conn: &mut Connection, lote: &[Batida]) -> AppResult<usize> {
    let tx = conn.transaction()?;
    let mut gravadas = 0usize;

    {
        let mut stmt = tx.prepare(
            "INSERT INTO ponto_batidas
                (funcionario_id, emp, dat, hora, locacao_id, origem, lat, lng,
                 endereco, distancia_m, status, justificativa, processo, tip, ori,
                 anexo, created_at, deleted_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
        )?;

        for b in lote {
            gravadas += stmt.execute(params![
                b.funcionario_id,
                b.emp,
                b.dat_str(),
                b.hora_str(),
                b.locacao_id,
                b.origem,
                b.lat,
                b.lng,
                b.endereco,
                b.distancia_m,
                b.status,
                b.justificativa,
                b.processo.format(FORMATO_TIMESTAMP).to_string(),
                b.tip.map(|t| t.to_db_str()),
                b.ori,
                b.anexo,
                b.created_at,
                b.deleted_at,
            ])?;
        }
    }

    tx.commit()?;
    Ok(gravadas)
}

/// Rectification update: justification, attachment and the recomputed
/// ordinal role, in one statement.
pub fn update_batida_retificada(
    conn: &Connection,
    id: i64,
    justificativa: &str,
    anexo: Option<&str>,
    tip: TipoBatida,
) -> AppResult<()> {
    conn.execute(
        "UPDATE ponto_batidas
         SET justificativa = ?1,
             anexo = COALESCE(?2, anexo),
             tip = ?3
         WHERE id = ?4",
        params![justificativa, anexo, tip.to_db_str(), id],
    )?;
    Ok(())
}

/// Soft delete: stamps deleted_at, leaves the row in place for sync clients.
/// Returns the number of rows touched (0 = no live punch matched).
pub fn soft_delete_batida(
    conn: &Connection,
    id: i64,
    funcionario_id: i64,
    quando: NaiveDateTime,
) -> AppResult<usize> {
    let n = conn.execute(
        "UPDATE ponto_batidas
         SET deleted_at = ?1
         WHERE id = ?2 AND funcionario_id = ?3 AND deleted_at IS NULL",
        params![
            quando.format(FORMATO_TIMESTAMP).to_string(),
            id,
            funcionario_id
        ],
    )?;
    Ok(n)
}

// ---------------------------------------------------------------------------
// funcionarios
// ---------------------------------------------------------------------------

pub fn find_funcionario(conn: &Connection, id: i64) -> AppResult<Option<Funcionario>> {
    let mut stmt =
        conn.prepare("SELECT * FROM funcionarios WHERE id = ?1 AND deleted_at IS NULL")?;

    let mut rows = stmt.query_map([id], map_funcionario_row)?;

    match rows.next() {
        Some(r) => Ok(Some(r?)),
        None => Ok(None),
    }
}

pub fn insert_funcionario(conn: &Connection, emp: &str, nome: &str) -> AppResult<Funcionario> {
    conn.execute(
        "INSERT INTO funcionarios (emp, nome) VALUES (?1, ?2)",
        params![emp, nome],
    )?;

    Ok(Funcionario {
        id: conn.last_insert_rowid(),
        emp: emp.to_string(),
        nome: nome.to_string(),
        deleted_at: None,
    })
}

pub fn load_funcionarios(conn: &Connection) -> AppResult<Vec<Funcionario>> {
    let mut stmt =
        conn.prepare("SELECT * FROM funcionarios WHERE deleted_at IS NULL ORDER BY id ASC")?;

    let rows = stmt.query_map([], map_funcionario_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// ponto_eventos
// ---------------------------------------------------------------------------

/// Insert a correction event. Store-level failures are NOT translated here;
/// the engine decides how constraint violations surface to its caller.
pub fn insert_evento(conn: &Connection, ev: &PontoEvento) -> Result<PontoEvento> {
    conn.execute(
        "INSERT INTO ponto_eventos
            (emp, funcionario_id, tipo, data_inicio, data_fim, motivo,
             observacao, anexo, aprovacao, aprovador_id, aprovado_em, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            ev.emp,
            ev.funcionario_id,
            ev.tipo.to_db_str(),
            ev.data_inicio.format(FORMATO_TIMESTAMP).to_string(),
            ev.data_fim.map(|d| d.format(FORMATO_TIMESTAMP).to_string()),
            ev.motivo,
            ev.observacao,
            ev.anexo,
            ev.aprovacao.to_db_str(),
            ev.aprovador_id,
            ev.aprovado_em
                .map(|d| d.format(FORMATO_TIMESTAMP).to_string()),
            ev.created_at,
        ],
    )?;

    let mut inserido = ev.clone();
    inserido.id = conn.last_insert_rowid();
    Ok(inserido)
}

pub fn find_evento_por_id(conn: &Connection, id: i64) -> AppResult<Option<PontoEvento>> {
    let mut stmt = conn.prepare("SELECT * FROM ponto_eventos WHERE id = ?1")?;

    let mut rows = stmt.query_map([id], map_evento_row)?;

    match rows.next() {
        Some(r) => Ok(Some(r?)),
        None => Ok(None),
    }
}
