//! Operator CLI for the content store.
//!
//! # Responsibility
//! - Verify `oftisoft_core` linkage (`ping`).
//! - Seed default documents and print live previews from the SQLite store.

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use log::info;
use oftisoft_core::model::community::CommunityContent;
use oftisoft_core::model::pricing::PricingContent;
use oftisoft_core::model::privacy::PrivacyContent;
use oftisoft_core::model::status::StatusContent;
use oftisoft_core::{
    init_logging_from_config, open_db, BuiltinIconRegistry, Connection, ContentDomain,
    EditSession, EditorConfig, Preview, SqliteContentGateway,
};

#[derive(Debug, Parser)]
#[command(name = "oftisoft", version, about = "Oftisoft content store tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print core linkage and version.
    Ping,
    /// List editable content domains.
    Domains,
    /// Insert default documents for domains that have none.
    Seed {
        /// Seed a single domain instead of all of them.
        #[arg(long, value_parser = parse_domain)]
        domain: Option<ContentDomain>,
    },
    /// Print the display preview of a stored document as JSON.
    Show {
        #[arg(value_parser = parse_domain)]
        domain: ContentDomain,
    },
}

fn parse_domain(value: &str) -> Result<ContentDomain, String> {
    ContentDomain::parse(value).ok_or_else(|| {
        let known: Vec<&str> = ContentDomain::ALL.iter().map(|d| d.as_str()).collect();
        format!("unknown domain `{value}`; expected one of {}", known.join("|"))
    })
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = EditorConfig::from_env();
    init_logging_from_config(&config)
        .map_err(|message| anyhow!(message))
        .context("failed to initialize logging")?;

    match cli.command {
        Command::Ping => {
            println!("oftisoft_core ping={}", oftisoft_core::ping());
            println!("oftisoft_core version={}", oftisoft_core::core_version());
        }
        Command::Domains => {
            for domain in ContentDomain::ALL {
                println!("{domain}");
            }
        }
        Command::Seed { domain } => {
            let conn = open_db(&config.db_path)
                .with_context(|| format!("failed to open `{}`", config.db_path.display()))?;
            let domains = domain.map_or(ContentDomain::ALL.to_vec(), |d| vec![d]);
            for domain in domains {
                let inserted = seed(&conn, domain)?;
                println!(
                    "{domain}: {}",
                    if inserted { "seeded" } else { "already present" }
                );
            }
        }
        Command::Show { domain } => {
            let conn = open_db(&config.db_path)
                .with_context(|| format!("failed to open `{}`", config.db_path.display()))?;
            let json = match domain {
                ContentDomain::Community => preview_json::<CommunityContent>(&conn)?,
                ContentDomain::Pricing => preview_json::<PricingContent>(&conn)?,
                ContentDomain::Privacy => preview_json::<PrivacyContent>(&conn)?,
                ContentDomain::Status => preview_json::<StatusContent>(&conn)?,
            };
            println!("{json}");
        }
    }
    Ok(())
}

fn seed(conn: &Connection, domain: ContentDomain) -> anyhow::Result<bool> {
    let gateway = SqliteContentGateway::new(conn);
    let result = match domain {
        ContentDomain::Community => gateway.seed_defaults::<CommunityContent>(),
        ContentDomain::Pricing => gateway.seed_defaults::<PricingContent>(),
        ContentDomain::Privacy => gateway.seed_defaults::<PrivacyContent>(),
        ContentDomain::Status => gateway.seed_defaults::<StatusContent>(),
    };
    result.with_context(|| format!("failed to seed {domain} content"))
}

fn preview_json<D: Preview>(conn: &Connection) -> anyhow::Result<String> {
    let mut session = EditSession::<D, _>::new(SqliteContentGateway::new(conn));
    session
        .hydrate()
        .with_context(|| format!("failed to load {} content", D::DOMAIN))?;
    let view = session
        .preview(&BuiltinIconRegistry)
        .ok_or_else(|| anyhow!("{} content is not loaded", D::DOMAIN))?;
    info!(
        "event=cli_show module=cli status=ok domain={} session={}",
        D::DOMAIN,
        session.session_id()
    );
    Ok(serde_json::to_string_pretty(&view)?)
}

fn main() {
    if let Err(err) = run(Cli::parse()) {
        eprintln!("oftisoft: {err:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_domain, preview_json, seed};
    use oftisoft_core::model::community::CommunityContent;
    use oftisoft_core::model::privacy::PrivacyContent;
    use oftisoft_core::{open_db_in_memory, ContentDomain};

    #[test]
    fn show_on_empty_store_reports_domain_and_cause() {
        let conn = open_db_in_memory().unwrap();
        let err = preview_json::<CommunityContent>(&conn).unwrap_err();
        let rendered = format!("{err:#}");
        assert!(rendered.starts_with("failed to load community content"));
        assert!(rendered.contains("content not found: community"));
    }

    #[test]
    fn seed_then_show_prints_preview_json() {
        let conn = open_db_in_memory().unwrap();
        assert!(seed(&conn, ContentDomain::Privacy).unwrap());
        assert!(!seed(&conn, ContentDomain::Privacy).unwrap());

        let json = preview_json::<PrivacyContent>(&conn).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["sections"][0]["id"], "section-collection");
    }

    #[test]
    fn parse_domain_lists_known_domains_on_error() {
        assert_eq!(parse_domain(" Pricing ").unwrap(), ContentDomain::Pricing);
        let err = parse_domain("careers").unwrap_err();
        assert!(err.contains("community|pricing|privacy|status"));
    }
}
