//! assetdesk - diagnostic CLI for the dashboard permission core.
//!
//! Lets an operator check how the role hierarchy resolves a given session
//! role, derive idempotency keys, and inspect metrics without running the UI.

use anyhow::Context;
use assetdesk::cache::{IdempotencyCache, IdempotencyKey};
use assetdesk::config::Config;
use assetdesk::roles::{Role, RoleAuthority};
use assetdesk::{metrics, telemetry};
use tracing::{error, info};

const USAGE: &str = "\
usage: assetdesk <command> [args]

commands:
  roles                         list the role hierarchy as JSON
  check <subject> <required>    exit 0 if subject meets required, 1 otherwise
  assignable <subject>          roles the subject may grant, highest first
  key <operation> <target>      derive the idempotency key for an operation
  metrics                       run a self-check and print Prometheus metrics

environment:
  ASSETDESK_CONFIG              config file (default: assetdesk.toml)";

fn main() -> anyhow::Result<()> {
    // Load configuration
    let config_path =
        std::env::var("ASSETDESK_CONFIG").unwrap_or_else(|_| "assetdesk.toml".to_string());
    let config = Config::load_or_default(&config_path)
        .with_context(|| format!("failed to load config from {config_path}"))?;

    telemetry::init(&config.logging)?;

    let config = config
        .validated()
        .inspect_err(|e| {
            for detail in e.validation_errors() {
                error!(
                    path = %config_path,
                    code = detail.error_code(),
                    error = %detail,
                    "Invalid configuration"
                );
            }
        })
        .with_context(|| format!("invalid config in {config_path}"))?;

    metrics::init();
    let authority = RoleAuthority::new(&config.roles);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args.as_slice() {
        ["roles"] => {
            let listing = serde_json::to_string_pretty(&Role::descriptors())?;
            println!("{listing}");
        }
        ["check", subject, required] => {
            let _span = telemetry::spans::permission_check(subject, required).entered();
            if authority.has_minimum_role(subject, required) {
                println!("allow");
            } else {
                println!("deny");
                std::process::exit(1);
            }
        }
        ["assignable", subject] => {
            for role in authority.assignable_roles(subject).iter().rev() {
                println!("{}\t{}\t{}", role.rank(), role, role.label());
            }
        }
        ["key", operation, target] => {
            println!("{}", IdempotencyKey::for_operation(operation, target));
        }
        ["metrics"] => {
            self_check(&authority, &config);
            print!("{}", metrics::gather_metrics());
        }
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    }

    Ok(())
}

/// Exercise every role pair and a cache round-trip so the counters have data.
fn self_check(authority: &RoleAuthority, config: &Config) {
    for subject in Role::ALL {
        for required in Role::ALL {
            authority.has_minimum_role(subject.as_str(), required.as_str());
        }
    }

    let cache: IdempotencyCache<bool> = IdempotencyCache::from_config(&config.cache);
    let key = IdempotencyKey::random();
    let _span = telemetry::spans::cache_op("self_check", key.as_str()).entered();
    cache.put(key.clone(), true);
    let replayed = cache.get(key.as_str()).unwrap_or(false);
    cache.invalidate(key.as_str());

    info!(
        replayed,
        default_ttl_ms = u64::try_from(cache.default_ttl().as_millis()).unwrap_or(u64::MAX),
        "Self-check completed"
    );
}
