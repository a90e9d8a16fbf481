use stampkit_core::{HAlign, ReinkPolicy, StampSize, VAlign};
use stampkit_designer::AngleSource;
use stampkit_settings::{load_font, LayoutSettings, StampConfig};
use tempfile::tempdir;

const TOML_CONFIG: &str = r#"
width = 760
height = 570
rotated = true
reink = "alternate"
hAlign = "justified"
vAlign = "fill"
seed = 42
setStampUpHeight = 62

[border]
left = 30
right = 30
top = 30
bottom = 30

[inkPosition]
left = 822
right = 902
top = 330
bottom = 280

[machine]
toolIndexBase = 1
toolOrder = ["1", "2"]

[machine.header]
targetMachine = "Bench Plotter"

[preview]
style = "arrow"
dpi = 96

[layout]
mode = "field"
cellSize = 10
directions = 24
randomiseNoise = true

[layout.angles]
source = "noise"
stepX = 0.05
"#;

#[test]
fn test_load_toml_config() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("field.toml");
    std::fs::write(&path, TOML_CONFIG).unwrap();

    let config = StampConfig::load_from_file(&path).unwrap();
    assert_eq!(config.h_align, HAlign::Justified);
    assert_eq!(config.v_align, VAlign::Fill);
    assert_eq!(config.reink, ReinkPolicy::Alternate);
    assert_eq!(config.seed, Some(42));
    assert_eq!(config.stamp_up_height, 62.0);
    assert_eq!(config.machine.header.target_machine, "Bench Plotter");
    assert_eq!(config.machine.header.install_height, 5.5);

    match &config.layout {
        LayoutSettings::Field(field) => {
            assert!(field.randomise_noise);
            match field.angles {
                AngleSource::Noise(noise) => {
                    assert_eq!(noise.step_x, 0.05);
                    assert_eq!(noise.step_y, 0.117);
                }
                other => panic!("unexpected angles {other:?}"),
            }
        }
        other => panic!("unexpected layout {other:?}"),
    }

    let profile = config.machine_profile(StampSize {
        width: 10.0,
        height: 10.0,
    })
    .unwrap();
    assert_eq!(profile.tool_index_base(), 1);
    assert_eq!(profile.to_bed(10.0, 20.0), (20.0, 10.0));
}

#[test]
fn test_json_round_trip() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("source.toml");
    std::fs::write(&source, TOML_CONFIG).unwrap();
    let config = StampConfig::load_from_file(&source).unwrap();

    let saved = dir.path().join("saved.json");
    config.save_to_file(&saved).unwrap();
    let reloaded = StampConfig::load_from_file(&saved).unwrap();
    assert_eq!(config, reloaded);
}

#[test]
fn test_missing_and_unsupported_files() {
    let dir = tempdir().unwrap();
    let err = StampConfig::load_from_file(&dir.path().join("absent.json")).unwrap_err();
    assert!(err.is_config_error());
    assert!(err.to_string().starts_with("Missing file"));

    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "width: 1").unwrap();
    let err = StampConfig::load_from_file(&path).unwrap_err();
    assert_eq!(err.to_string(), "Unsupported config format: yaml");
}

#[test]
fn test_invalid_geometry_rejected_on_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(
        &path,
        r#"{
            "width": 100, "height": 100,
            "border": { "left": 60, "right": 0, "top": 0, "bottom": 0 },
            "inkPosition": { "left": 822, "right": 902, "top": 330, "bottom": 280 }
        }"#,
    )
    .unwrap();
    let err = StampConfig::load_from_file(&path).unwrap_err();
    assert!(err.is_config_error());
    assert!(err.to_string().contains("border.left"));
}

#[test]
fn test_load_font_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ten.json");
    std::fs::write(
        &path,
        r#"{
            "size": { "width": 10, "height": 10 },
            "glyphs": {
                "K": { "width": 5.0, "xNudge": 0.45 },
                " ": { "width": 10 }
            }
        }"#,
    )
    .unwrap();
    let font = load_font(&path).unwrap();
    assert_eq!(font.metric("K").unwrap().x_nudge, 0.45);
    assert!(font.contains(" "));
}
