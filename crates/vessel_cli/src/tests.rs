use super::*;
use std::path::Path;
use vessel_platform::{TouchEvent, TouchPhase};
use vessel_platform_desktop::DesktopHostConfig;

fn scratch(name: &str) -> PathBuf {
    let root = std::env::temp_dir().join(format!("vessel-cli-{}-{}", name, std::process::id()));
    std::fs::create_dir_all(root.join("assets/gfx")).unwrap();
    std::fs::write(root.join("assets/gfx/logo.tga"), vec![7u8; 1024]).unwrap();
    root
}

fn config_at(root: &Path) -> VesselConfig {
    let mut config = VesselConfig::default();
    config.host = DesktopHostConfig::rooted_at(root);
    config.demo.resource = Some("/gfx/logo.tga".to_string());
    config
}

#[test]
fn test_run_visits_every_hook_in_order() {
    let root = scratch("run");
    let report = cmd_run(config_at(&root), Some(4)).unwrap();

    assert_eq!(
        report.hooks,
        vec![
            "initialize",
            "visible",
            "active",
            "render",
            "inactive",
            "save_state",
            "hidden"
        ]
    );
    assert_eq!(report.frames, 4);
    assert_eq!(report.resource_len, Some(1024));
    assert_eq!(
        report.touches,
        vec![
            TouchEvent {
                phase: TouchPhase::Down,
                x: 240,
                y: 400
            },
            TouchEvent {
                phase: TouchPhase::Up,
                x: 240,
                y: 400
            }
        ]
    );

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn test_run_with_after_hidden_policy() {
    let root = scratch("ios");
    let mut config = config_at(&root);
    config.runtime.save_state = SaveStatePolicy::AfterHidden;

    let report = cmd_run(config, Some(1)).unwrap();
    assert_eq!(
        &report.hooks[report.hooks.len() - 3..],
        &["inactive", "hidden", "save_state"]
    );

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn test_missing_resource_does_not_stop_the_run() {
    let root = scratch("missing");
    let mut config = config_at(&root);
    config.demo.resource = Some("/gfx/absent.tga".to_string());

    let report = cmd_run(config, Some(0)).unwrap();
    assert_eq!(report.resource_len, None);
    assert_eq!(report.frames, 0);
    assert_eq!(report.hooks.last(), Some(&"hidden"));

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn test_asset_command() {
    let root = scratch("asset");
    let config = config_at(&root);

    assert_eq!(cmd_asset(&config, "/gfx/logo.tga").unwrap(), 1024);
    assert!(cmd_asset(&config, "/gfx/absent.tga").is_err());
    assert!(cmd_asset(&config, "gfx/logo.tga").is_err());

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn test_cli_parses_subcommands() {
    let cli = Cli::try_parse_from(["vessel", "run", "--frames", "5"]).unwrap();
    assert!(matches!(cli.command, Commands::Run { frames: Some(5) }));

    let cli = Cli::try_parse_from(["vessel", "--config", "x.toml", "asset", "/a.bin"]).unwrap();
    assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
    assert!(matches!(cli.command, Commands::Asset { ref path } if path == "/a.bin"));

    assert!(Cli::try_parse_from(["vessel"]).is_err());
}
