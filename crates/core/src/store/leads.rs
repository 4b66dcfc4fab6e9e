//! Lead records and keyword search.

use super::connection::Store;
use crate::Error;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::rusqlite::params_from_iter;

/// Maximum number of leads returned by a keyword search.
pub const SEARCH_LIMIT: usize = 20;

/// Columns matched by keyword search.
const SEARCH_COLUMNS: &[&str] = &["company_name", "industry", "position", "email", "website"];

/// A stored lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: i64,
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub position: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
}

/// A lead to insert.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewLead {
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub position: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
}

/// Keyword-searchable lead storage.
#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Leads where any keyword matches any searchable column, at most [`SEARCH_LIMIT`].
    async fn search(&self, keywords: &[String]) -> Result<Vec<Lead>, Error>;

    /// Insert a lead, returning its id.
    async fn insert(&self, lead: NewLead) -> Result<i64, Error>;
}

/// Make `%` and `_` in a keyword match literally.
fn escape_like(keyword: &str) -> String {
    let mut out = String::with_capacity(keyword.len());
    for c in keyword.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Build the WHERE clause and bind values for a keyword OR-match.
///
/// Returns None when no keyword is usable.
fn keyword_filter(keywords: &[String]) -> Option<(String, Vec<String>)> {
    let terms: Vec<String> = keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .map(|k| format!("%{}%", escape_like(&k.to_lowercase())))
        .collect();

    if terms.is_empty() {
        return None;
    }

    let mut clauses = Vec::with_capacity(terms.len() * SEARCH_COLUMNS.len());
    let mut binds = Vec::with_capacity(clauses.capacity());
    for term in &terms {
        for column in SEARCH_COLUMNS {
            clauses.push(format!("LOWER(COALESCE({column}, '')) LIKE ? ESCAPE '\\'"));
            binds.push(term.clone());
        }
    }

    Some((clauses.join(" OR "), binds))
}

#[async_trait]
impl LeadStore for Store {
    async fn search(&self, keywords: &[String]) -> Result<Vec<Lead>, Error> {
        let Some((filter, binds)) = keyword_filter(keywords) else {
            return Ok(Vec::new());
        };

        let sql = format!(
            "SELECT id, company_name, industry, position, email, phone, website
             FROM leads WHERE {filter} ORDER BY id LIMIT {SEARCH_LIMIT}"
        );

        self.conn
            .call(move |conn| -> Result<Vec<Lead>, Error> {
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(params_from_iter(binds.iter()), |row| {
                    Ok(Lead {
                        id: row.get(0)?,
                        company_name: row.get(1)?,
                        industry: row.get(2)?,
                        position: row.get(3)?,
                        email: row.get(4)?,
                        phone: row.get(5)?,
                        website: row.get(6)?,
                    })
                })?;

                let mut leads = Vec::new();
                for lead in rows {
                    leads.push(lead?);
                }
                Ok(leads)
            })
            .await
            .map_err(Error::from)
    }

    async fn insert(&self, lead: NewLead) -> Result<i64, Error> {
        let created_at = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<i64, Error> {
                conn.execute(
                    "INSERT INTO leads (company_name, industry, position, email, phone, website, created_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    tokio_rusqlite::params![
                        &lead.company_name,
                        &lead.industry,
                        &lead.position,
                        &lead.email,
                        &lead.phone,
                        &lead.website,
                        &created_at,
                    ],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(Error::from)
    }
}
