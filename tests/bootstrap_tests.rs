// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for bootstrap: `-v`, `-cfg` and provider loading from
//! files and URLs.

mod common;

use flagcfg::prelude::*;
use flagcfg::service::{extract_config_path, load_provider};
use std::io::Write;
use tempfile::NamedTempFile;

const NO_ENV: [&str; 0] = [];

fn properties_file(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn test_config_path_examples() {
    assert_eq!(
        extract_config_path(&["-cfg=https://example/conf.properties"]).unwrap(),
        Some("https://example/conf.properties".to_string())
    );
    assert_eq!(
        extract_config_path(&["-cfg='/tmp/a b.properties'"]).unwrap(),
        Some("/tmp/a b.properties".to_string())
    );
    assert!(matches!(
        extract_config_path(&["-cfg="]),
        Err(ConfigError::InvalidConfigPath)
    ));
}

#[test]
fn test_version_flag_short_circuits_regardless_of_other_flags() {
    for args in [
        vec!["-v"],
        vec!["-postgres.port=bad", "-v"],
        vec!["-v", "-cfg="],
        vec!["-unknown", "--v", "positional"],
    ] {
        let loaded = Bootstrap::new(args.clone(), NO_ENV).run().unwrap();
        assert!(loaded.is_none(), "{:?}", args);
    }
}

#[test]
fn test_no_config_path_is_not_an_error() {
    let loaded = Bootstrap::new(NO_ENV, NO_ENV).run().unwrap().unwrap();
    assert_eq!(loaded.config, Configuration::default());
    assert!(loaded.provenance.is_empty());
    assert!(loaded.positional.is_empty());
}

#[test]
fn test_loads_properties_file_with_separate_value() {
    let file = properties_file(&[
        "# migration settings",
        "postgres.host = pg.internal",
        "postgres.port: 5433",
        "postgres.debug=true",
        "migrate.tables=jobs,\\",
        "    audits, users",
    ]);
    let path = file.path().to_string_lossy().into_owned();

    let loaded = Bootstrap::new(vec!["-cfg".to_string(), path], NO_ENV)
        .run()
        .unwrap()
        .unwrap();

    assert_eq!(loaded.config.postgres.host, "pg.internal");
    assert_eq!(loaded.config.postgres.port, 5433);
    assert!(loaded.config.postgres.debug);
    assert_eq!(loaded.config.migrate.tables, vec!["jobs", "audits", "users"]);
}

#[test]
fn test_loads_properties_file_with_quoted_path() {
    let file = properties_file(&["clickhouse.name=analytics"]);
    let arg = format!("-cfg=\"{}\"", file.path().display());

    let loaded = Bootstrap::new([arg], NO_ENV).run().unwrap().unwrap();
    assert_eq!(loaded.config.clickhouse.name, "analytics");
}

#[test]
fn test_cfg_arguments_do_not_reach_flag_parser() {
    let file = properties_file(&["postgres.db=workspace"]);
    let path = file.path().to_string_lossy().into_owned();

    let loaded = Bootstrap::new(
        vec![
            "-postgres.user=admin".to_string(),
            "-cfg".to_string(),
            path,
            "-test.count=1".to_string(),
        ],
        NO_ENV,
    )
    .run()
    .unwrap()
    .unwrap();

    assert_eq!(loaded.config.postgres.user, "admin");
    assert_eq!(loaded.config.postgres.db, "workspace");
    assert!(!loaded.provenance.is_set("cfg"));
}

#[test]
fn test_missing_file_names_path() {
    let err = load_provider(Some("/nonexistent/dir/app.properties")).unwrap_err();
    match err {
        ConfigError::ProviderLoadFailure { location, .. } => {
            assert_eq!(location, "/nonexistent/dir/app.properties")
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_positional_arguments_are_returned() {
    let loaded = Bootstrap::new(["-postgres.debug", "run", "-x"], NO_ENV)
        .run()
        .unwrap()
        .unwrap();
    assert_eq!(loaded.positional, vec!["run", "-x"]);
}

#[cfg(feature = "remote")]
mod remote {
    use super::common::serve_once;
    use super::NO_ENV;
    use flagcfg::prelude::*;
    use std::time::Duration;

    #[test]
    fn test_loads_properties_from_url() {
        let url = serve_once(
            "200 OK",
            "clickhouse.ip=10.0.0.9\nclickhouse.port=9440\nclickhouse.params=secure=true\n",
        );

        let loaded = Bootstrap::new([format!("-cfg={}", url)], NO_ENV)
            .with_timeout(Duration::from_secs(5))
            .run()
            .unwrap()
            .unwrap();

        assert_eq!(loaded.config.clickhouse.ip, "10.0.0.9");
        assert_eq!(loaded.config.clickhouse.port, 9440);
        assert_eq!(loaded.config.clickhouse.params.len(), 1);
        assert_eq!(
            loaded.provenance.origin("clickhouse.ip"),
            Some(&Origin::Properties { location: url })
        );
    }

    #[test]
    fn test_url_error_status_fails() {
        let url = serve_once("404 Not Found", "missing");

        let err = Bootstrap::new(["-cfg".to_string(), url.clone()], NO_ENV)
            .with_timeout(Duration::from_secs(5))
            .run()
            .unwrap_err();

        match err {
            ConfigError::ProviderLoadFailure { location, message, .. } => {
                assert_eq!(location, url);
                assert!(message.contains("404"), "{}", message);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_unreachable_url_fails() {
        // Bind and drop a listener to get a port nothing listens on.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let url = format!("http://127.0.0.1:{}/app.properties", port);

        let err = PropertiesAdapter::load_with_timeout(Some(url.as_str()), Duration::from_secs(2))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ProviderLoadFailure { .. }));
    }
}
