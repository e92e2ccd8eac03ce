//! Backend feature audits ensure required DB capabilities are available.

use diesel::result::{Error as DieselError, QueryResult};
use diesel_async::RunQueryDsl;

use super::connection::DbConnection;

/// Oldest `SQLite` release that understands `INSERT ... RETURNING`.
#[cfg(feature = "sqlite")]
const MIN_SQLITE_VERSION: (u32, u32) = (3, 35);

/// Oldest `PostgreSQL` major version the application is tested against.
#[cfg(feature = "postgres")]
const MIN_POSTGRES_MAJOR: u32 = 14;

fn unsupported(message: String) -> DieselError {
    DieselError::QueryBuilderError(Box::new(std::io::Error::other(message)))
}

/// Split a dotted version string into its numeric major and minor parts.
fn parse_major_minor(version: &str) -> Option<(u32, u32)> {
    let mut parts = version.split('.');
    let major = parts.next()?.trim().parse().ok()?;
    let minor = parts.next().map_or(Some(0), |m| m.trim().parse().ok())?;
    Some((major, minor))
}

/// Verify that the linked `SQLite` library supports `RETURNING` clauses,
/// which list and item creation rely on to learn generated identifiers.
///
/// # Errors
/// Returns any error produced by the version query, or an error when the
/// library is older than 3.35.
#[cfg(feature = "sqlite")]
#[must_use = "handle the result"]
pub async fn audit_sqlite_features(conn: &mut DbConnection) -> QueryResult<()> {
    use diesel::{dsl::sql, sql_types::Text};

    let version: String = diesel::select(sql::<Text>("sqlite_version()"))
        .get_result(conn)
        .await?;
    let parsed = parse_major_minor(&version)
        .ok_or_else(|| unsupported(format!("unable to parse sqlite version: {version}")))?;
    if parsed < MIN_SQLITE_VERSION {
        return Err(unsupported(format!(
            "sqlite version {version} is not supported (require >= {}.{})",
            MIN_SQLITE_VERSION.0, MIN_SQLITE_VERSION.1
        )));
    }
    tracing::debug!(%version, "sqlite feature audit passed");
    Ok(())
}

/// Verify that the Postgres server meets application requirements.
///
/// Checks that the connected `PostgreSQL` server version is at least 14.
///
/// # Errors
/// Returns any error produced by the version query or if the version string
/// cannot be parsed or is too old.
#[cfg(feature = "postgres")]
#[must_use = "handle the result"]
pub async fn audit_postgres_features(conn: &mut DbConnection) -> QueryResult<()> {
    use diesel::{QueryableByName, sql_query, sql_types::Text};

    #[derive(QueryableByName)]
    struct PgVersion {
        #[diesel(sql_type = Text)]
        version: String,
    }

    let row: PgVersion = sql_query("SELECT version()").get_result(conn).await?;

    let (major, _) = row
        .version
        .split_whitespace()
        .nth(1)
        .and_then(parse_major_minor)
        .ok_or_else(|| unsupported(format!("unable to parse postgres version: {}", row.version)))?;

    if major < MIN_POSTGRES_MAJOR {
        return Err(unsupported(format!(
            "postgres version {major} is not supported (require >= {MIN_POSTGRES_MAJOR})"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::parse_major_minor;

    #[rstest]
    #[case("3.45.1", Some((3, 45)))]
    #[case("3.35", Some((3, 35)))]
    #[case("16", Some((16, 0)))]
    #[case("16.2", Some((16, 2)))]
    #[case("beta", None)]
    #[case("3.x", None)]
    fn parses_version_strings(#[case] input: &str, #[case] expected: Option<(u32, u32)>) {
        assert_eq!(parse_major_minor(input), expected);
    }
}
