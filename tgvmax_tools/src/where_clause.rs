use std::fmt::{Display, Formatter};

use chrono::NaiveDate;

/// Builder for the ODSQL `where` expression understood by the records endpoint.
///
/// ```text
/// origine_iata="FRPLY" AND destination_iata="FRLYS" AND date>="2024-06-01" AND date<="2024-06-01"
/// ```
///
/// [`WhereClause::after`] adds the pagination cursor (`date > "..."`) without touching the rest of the filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WhereClause {
    origin: Option<String>,
    destination: Option<String>,
    from_date: Option<NaiveDate>,
    to_date: Option<NaiveDate>,
    after: Option<String>,
}

impl WhereClause {
    pub fn route<S: Into<String>>(origin: S, destination: S) -> Self {
        Self { origin: Some(origin.into()), destination: Some(destination.into()), ..Default::default() }
    }

    pub fn on_date(self, date: NaiveDate) -> Self {
        self.between(date, date)
    }

    pub fn between(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.from_date = Some(from);
        self.to_date = Some(to);
        self
    }

    /// Returns a copy of this clause restricted to records strictly later than `cursor`.
    pub fn after<S: Into<String>>(&self, cursor: S) -> Self {
        Self { after: Some(cursor.into()), ..self.clone() }
    }

    pub fn cursor(&self) -> Option<&str> {
        self.after.as_deref()
    }
}

/// Strips anything that could escape a double-quoted ODSQL literal.
fn quoted(value: &str) -> String {
    let clean = value.chars().filter(|c| *c != '"' && *c != '\\').collect::<String>();
    format!("\"{clean}\"")
}

impl Display for WhereClause {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut terms = Vec::with_capacity(5);
        if let Some(origin) = &self.origin {
            terms.push(format!("origine_iata={}", quoted(origin)));
        }
        if let Some(destination) = &self.destination {
            terms.push(format!("destination_iata={}", quoted(destination)));
        }
        if let Some(from) = &self.from_date {
            terms.push(format!("date>=\"{}\"", from.format("%Y-%m-%d")));
        }
        if let Some(to) = &self.to_date {
            terms.push(format!("date<=\"{}\"", to.format("%Y-%m-%d")));
        }
        if let Some(cursor) = &self.after {
            terms.push(format!("date > {}", quoted(cursor)));
        }
        write!(f, "{}", terms.join(" AND "))
    }
}
