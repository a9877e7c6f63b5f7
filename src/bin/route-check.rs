use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use url::Url;

use front_controller::config::{load_config, AppConfig};
use front_controller::lifecycle::startup::build_routes;
use front_controller::routing::{decode_path, normalize_query, query::rewrite_uri, RouteTable};

/// Base for inputs given as an absolute path (`/post/123`) or bare query (`?k=v`).
const BASE_URL: &str = "http://localhost/";

#[derive(Parser)]
#[command(name = "route-check")]
#[command(about = "Show how the route table dispatches URLs", long_about = None)]
struct Cli {
    /// TOML configuration file whose `[[routes]]` are used.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the compiled route table before checking inputs.
    #[arg(short, long)]
    list: bool,

    /// URLs (`http://host/post/123?sort=asc`, `/post/123?sort=asc`) or raw
    /// queries (`post/123&sort=asc`).
    #[arg(required_unless_present = "list")]
    inputs: Vec<String>,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    let routes = build_routes(&config)?;

    if cli.list {
        println!("{}", serde_json::to_string_pretty(&route_listing(&routes))?);
    }

    let mut all_matched = true;
    for input in &cli.inputs {
        all_matched &= check(&routes, input)?;
    }

    Ok(if all_matched {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// The table in match order: template, compiled regex and defaults.
fn route_listing(routes: &RouteTable) -> serde_json::Value {
    routes
        .entries()
        .iter()
        .enumerate()
        .map(|(position, entry)| {
            serde_json::json!({
                "position": position,
                "template": entry.pattern().template(),
                "regex": entry.pattern().as_str(),
                "defaults": entry.defaults(),
            })
        })
        .collect()
}

fn check(routes: &RouteTable, input: &str) -> Result<bool, serde_json::Error> {
    let raw = to_raw_query(input);
    let path = normalize_query(&raw);

    match routes.dispatch(path) {
        Ok(dispatch) => {
            let output = serde_json::json!({
                "input": input,
                "path": path,
                "dispatch": dispatch,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(true)
        }
        Err(e) => {
            println!("{input}: {e}");
            Ok(false)
        }
    }
}

/// URLs are rewritten the way the server does; anything that does not parse
/// as a URL is already a raw query.
fn to_raw_query(input: &str) -> String {
    let parsed = if input.starts_with(['/', '?']) {
        Url::parse(BASE_URL).and_then(|base| base.join(input))
    } else {
        Url::parse(input)
    };

    match parsed {
        Ok(url) if url.has_host() => rewrite_uri(&decode_path(url.path()), url.query()),
        _ => input.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_raw_query() {
        assert_eq!(to_raw_query("post/123&sort=asc"), "post/123&sort=asc");
        assert_eq!(to_raw_query("/post/123?sort=asc"), "post/123&sort=asc");
        assert_eq!(to_raw_query("?k1=v1"), "k1=v1");
        assert_eq!(to_raw_query("http://localhost"), "");
        assert_eq!(to_raw_query("http://localhost?k1=v1"), "k1=v1");
        assert_eq!(to_raw_query("https://example.com/abc/def?k1=v1"), "abc/def&k1=v1");
    }

    #[test]
    fn test_fragment_and_encoding_dropped_from_urls() {
        assert_eq!(to_raw_query("http://h/login#top"), "login");
        assert_eq!(to_raw_query("/login/ch%65ck?x=1#top"), "login/check&x=1");
    }

    #[test]
    fn test_check_default_routes() {
        let routes = build_routes(&AppConfig::default()).unwrap();
        assert!(check(&routes, "/login").unwrap());
        assert!(check(&routes, "http://h/login#top").unwrap());
        assert!(!check(&routes, "/a/b/c").unwrap());
    }

    #[test]
    fn test_route_listing() {
        let routes = build_routes(&AppConfig::default()).unwrap();
        let listing = route_listing(&routes);

        assert_eq!(listing.as_array().unwrap().len(), 3);
        assert_eq!(listing[1]["template"], "login");
        assert_eq!(listing[1]["regex"], "^(?:login)$");
        assert_eq!(listing[1]["defaults"]["controller"], "Login");
        assert_eq!(listing[2]["defaults"], serde_json::json!({}));
    }
}
