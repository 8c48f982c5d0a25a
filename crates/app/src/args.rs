use std::fmt;
use std::path::PathBuf;

use loyalty_core::model::{CustomerId, TierId};
use services::DEFAULT_ADMIN_PIN;
use storage::remote::RemoteConfig;

#[derive(Debug, PartialEq, Eq)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    MissingArgument { what: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidAmount { raw: String },
    InvalidDelta { raw: String },
    InvalidAccount { raw: String },
    InvalidTierId { raw: String },
    InvalidDbUrl { raw: String },
    ConflictingBackends,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingArgument { what } => write!(f, "missing {what}"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown command: {cmd}"),
            ArgsError::InvalidAmount { raw } => write!(f, "invalid amount: {raw}"),
            ArgsError::InvalidDelta { raw } => write!(f, "invalid spend delta: {raw}"),
            ArgsError::InvalidAccount { raw } => write!(f, "invalid account number: {raw:?}"),
            ArgsError::InvalidTierId { raw } => write!(f, "invalid tier id: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::ConflictingBackends => write!(f, "--db and --remote cannot be combined"),
        }
    }
}

impl std::error::Error for ArgsError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    Sqlite(String),
    Remote { base_url: String, api_key: Option<String> },
}

impl Backend {
    #[must_use]
    pub fn remote_config(&self) -> Option<RemoteConfig> {
        match self {
            Backend::Remote { base_url, api_key } => {
                Some(RemoteConfig::new(base_url.clone(), api_key.clone()))
            }
            Backend::Sqlite(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminAction {
    Customers { query: Option<String> },
    AddCustomer { account: String, name: String, spend: u64 },
    UpdateCustomer { id: CustomerId, name: String, spend: u64 },
    Bump { id: CustomerId, delta: i64 },
    RemoveCustomer { id: CustomerId },
    Tiers,
    AddTier { tier: Option<(u64, String)> },
    UpdateTier { id: TierId, threshold: u64, description: String },
    RemoveTier { id: TierId },
    Export { out: Option<PathBuf> },
    ResetDemo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Login { account: String },
    Seed,
    Admin { pin: Option<String>, action: AdminAction },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub backend: Backend,
    pub admin_pin: String,
    pub command: Command,
}

#[derive(Default)]
struct Flags {
    db: Option<String>,
    remote: Option<String>,
    remote_key: Option<String>,
    pin: Option<String>,
    query: Option<String>,
    out: Option<PathBuf>,
    help: bool,
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  loyalty login <account>");
    eprintln!("  loyalty seed");
    eprintln!("  loyalty admin --pin <pin> customers [--query <text>]");
    eprintln!("  loyalty admin --pin <pin> add-customer <account> <name> [<spend>]");
    eprintln!("  loyalty admin --pin <pin> update-customer <account> <name> <spend>");
    eprintln!("  loyalty admin --pin <pin> bump <account> <delta>");
    eprintln!("  loyalty admin --pin <pin> remove-customer <account>");
    eprintln!("  loyalty admin --pin <pin> tiers");
    eprintln!("  loyalty admin --pin <pin> add-tier [<threshold> <description>]");
    eprintln!("  loyalty admin --pin <pin> update-tier <tier-id> <threshold> <description>");
    eprintln!("  loyalty admin --pin <pin> remove-tier <tier-id>");
    eprintln!("  loyalty admin --pin <pin> export [--out <path>]");
    eprintln!("  loyalty admin --pin <pin> reset-demo");
    eprintln!();
    eprintln!("Storage (pick one):");
    eprintln!("  --db <sqlite_url>          default sqlite://loyalty.sqlite3");
    eprintln!("                             a new database starts with the demo data");
    eprintln!("  --remote <base_url> [--remote-key <key>]");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  LOYALTY_DB_URL, LOYALTY_REMOTE_URL, LOYALTY_REMOTE_KEY, LOYALTY_ADMIN_PIN, RUST_LOG");
}

/// Amounts are whole pesos; `_` and `.` group separators are ignored.
fn parse_amount(raw: &str) -> Result<u64, ArgsError> {
    let cleaned: String = raw.chars().filter(|c| !matches!(c, '_' | '.')).collect();
    cleaned
        .parse()
        .map_err(|_| ArgsError::InvalidAmount { raw: raw.to_owned() })
}

/// Signed amount; one leading `+` is allowed, separators as in `parse_amount`.
fn parse_delta(raw: &str) -> Result<i64, ArgsError> {
    let unsigned = raw.strip_prefix('+').unwrap_or(raw);
    let cleaned: String = unsigned
        .chars()
        .filter(|c| !matches!(c, '_' | '.'))
        .collect();
    if cleaned.starts_with('+') {
        return Err(ArgsError::InvalidDelta { raw: raw.to_owned() });
    }
    cleaned
        .parse()
        .map_err(|_| ArgsError::InvalidDelta { raw: raw.to_owned() })
}

fn parse_account(raw: &str) -> Result<CustomerId, ArgsError> {
    CustomerId::new(raw).map_err(|_| ArgsError::InvalidAccount { raw: raw.to_owned() })
}

fn parse_tier_id(raw: &str) -> Result<TierId, ArgsError> {
    raw.parse()
        .map_err(|_| ArgsError::InvalidTierId { raw: raw.to_owned() })
}

fn take(
    positionals: &mut std::vec::IntoIter<String>,
    what: &'static str,
) -> Result<String, ArgsError> {
    positionals.next().ok_or(ArgsError::MissingArgument { what })
}

fn reject_extra(positionals: &mut std::vec::IntoIter<String>) -> Result<(), ArgsError> {
    match positionals.next() {
        Some(extra) => Err(ArgsError::UnknownArg(extra)),
        None => Ok(()),
    }
}

/// `std::env::var` lookup, injectable for tests.
pub trait Env {
    fn var(&self, key: &str) -> Option<String>;
}

pub struct ProcessEnv;

impl Env for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.trim().is_empty())
    }
}

impl Args {
    pub fn parse(argv: impl IntoIterator<Item = String>, env: &dyn Env) -> Result<Self, ArgsError> {
        let mut flags = Flags::default();
        let mut positionals = Vec::new();
        let mut iter = argv.into_iter();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--db" => flags.db = Some(require_value(&mut iter, "--db")?),
                "--remote" => flags.remote = Some(require_value(&mut iter, "--remote")?),
                "--remote-key" => {
                    flags.remote_key = Some(require_value(&mut iter, "--remote-key")?);
                }
                "--pin" => flags.pin = Some(require_value(&mut iter, "--pin")?),
                "--query" | "-q" => flags.query = Some(require_value(&mut iter, "--query")?),
                "--out" | "-o" => flags.out = Some(require_value(&mut iter, "--out")?.into()),
                "--help" | "-h" => flags.help = true,
                other if other.starts_with("--") => return Err(ArgsError::UnknownArg(other.to_owned())),
                _ => positionals.push(arg),
            }
        }

        let backend = resolve_backend(&flags, env)?;
        let admin_pin = env
            .var("LOYALTY_ADMIN_PIN")
            .unwrap_or_else(|| DEFAULT_ADMIN_PIN.to_owned());

        if flags.help {
            return Ok(Self {
                backend,
                admin_pin,
                command: Command::Help,
            });
        }

        let mut positionals = positionals.into_iter();
        let command = match positionals.next().as_deref() {
            None | Some("help") => Command::Help,
            Some("login") => Command::Login {
                account: take(&mut positionals, "<account>")?,
            },
            Some("seed") => Command::Seed,
            Some("admin") => Command::Admin {
                pin: flags.pin.clone(),
                action: parse_admin(&mut positionals, &mut flags)?,
            },
            Some(other) => return Err(ArgsError::UnknownCommand(other.to_owned())),
        };
        reject_extra(&mut positionals)?;

        Ok(Self {
            backend,
            admin_pin,
            command,
        })
    }
}

fn resolve_backend(flags: &Flags, env: &dyn Env) -> Result<Backend, ArgsError> {
    if flags.db.is_some() && flags.remote.is_some() {
        return Err(ArgsError::ConflictingBackends);
    }
    if let Some(db) = &flags.db {
        if db.trim().is_empty() {
            return Err(ArgsError::InvalidDbUrl { raw: db.clone() });
        }
        return Ok(Backend::Sqlite(normalize_sqlite_url(db.clone())));
    }
    let remote = flags.remote.clone().or_else(|| env.var("LOYALTY_REMOTE_URL"));
    if let Some(base_url) = remote {
        let api_key = flags
            .remote_key
            .clone()
            .or_else(|| env.var("LOYALTY_REMOTE_KEY"));
        return Ok(Backend::Remote { base_url, api_key });
    }
    let db = env
        .var("LOYALTY_DB_URL")
        .unwrap_or_else(|| "sqlite://loyalty.sqlite3".into());
    Ok(Backend::Sqlite(normalize_sqlite_url(db)))
}

fn parse_admin(
    positionals: &mut std::vec::IntoIter<String>,
    flags: &mut Flags,
) -> Result<AdminAction, ArgsError> {
    let action = take(positionals, "admin action")?;
    let parsed = match action.as_str() {
        "customers" => AdminAction::Customers {
            query: flags.query.take(),
        },
        "add-customer" => {
            let account = take(positionals, "<account>")?;
            let name = take(positionals, "<name>")?;
            let spend = positionals
                .next()
                .map(|raw| parse_amount(&raw))
                .transpose()?
                .unwrap_or(0);
            AdminAction::AddCustomer {
                account,
                name,
                spend,
            }
        }
        "update-customer" => AdminAction::UpdateCustomer {
            id: parse_account(&take(positionals, "<account>")?)?,
            name: take(positionals, "<name>")?,
            spend: parse_amount(&take(positionals, "<spend>")?)?,
        },
        "bump" => AdminAction::Bump {
            id: parse_account(&take(positionals, "<account>")?)?,
            delta: parse_delta(&take(positionals, "<delta>")?)?,
        },
        "remove-customer" => AdminAction::RemoveCustomer {
            id: parse_account(&take(positionals, "<account>")?)?,
        },
        "tiers" => AdminAction::Tiers,
        "add-tier" => match positionals.next() {
            None => AdminAction::AddTier { tier: None },
            Some(raw) => AdminAction::AddTier {
                tier: Some((parse_amount(&raw)?, take(positionals, "<description>")?)),
            },
        },
        "update-tier" => AdminAction::UpdateTier {
            id: parse_tier_id(&take(positionals, "<tier-id>")?)?,
            threshold: parse_amount(&take(positionals, "<threshold>")?)?,
            description: take(positionals, "<description>")?,
        },
        "remove-tier" => AdminAction::RemoveTier {
            id: parse_tier_id(&take(positionals, "<tier-id>")?)?,
        },
        "export" => AdminAction::Export {
            out: flags.out.take(),
        },
        "reset-demo" => AdminAction::ResetDemo,
        other => return Err(ArgsError::UnknownCommand(format!("admin {other}"))),
    };
    Ok(parsed)
}

pub fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") || raw.starts_with("sqlite:file:")
    {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}
