use tileset_packer_core::config::PackerConfig;
use tileset_packer_core::error::TilesetPackerError;
use tileset_packer_core::pipeline::{pack_layout, pack_sprites, InputImage};

#[test]
fn test_zero_width() {
    let cfg = PackerConfig {
        max_width: 0,
        ..Default::default()
    };

    let result = cfg.validate();
    assert!(result.is_err());
    match result {
        Err(TilesetPackerError::InvalidDimensions { width, height }) => {
            assert_eq!(width, 0);
            assert_eq!(height, 256);
        }
        _ => panic!("Expected InvalidDimensions error"),
    }
}

#[test]
fn test_zero_height() {
    let cfg = PackerConfig {
        max_height: 0,
        ..Default::default()
    };

    assert!(cfg.validate().is_err());
}

#[test]
fn test_zero_grid_size() {
    let cfg = PackerConfig {
        grid_size: 0,
        ..Default::default()
    };

    let result = cfg.validate();
    assert!(result.is_err());
    match result {
        Err(TilesetPackerError::InvalidConfig(msg)) => {
            assert!(msg.contains("grid_size"));
        }
        _ => panic!("Expected InvalidConfig error"),
    }
}

#[test]
fn test_grid_size_exceeds_canvas() {
    let cfg = PackerConfig {
        max_width: 32,
        max_height: 32,
        grid_size: 48,
        ..Default::default()
    };

    let result = cfg.validate();
    assert!(result.is_err());
    match result {
        Err(TilesetPackerError::InvalidConfig(msg)) => {
            assert!(msg.contains("grid_size"));
        }
        _ => panic!("Expected InvalidConfig error"),
    }
}

#[test]
fn test_default_config_is_valid() {
    let cfg = PackerConfig::default();
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.cols(), 5);
    assert_eq!(cfg.rows(), 5);
}

/// The sprite cap may exceed the canvas; the session's no-progress guard
/// handles such sprites, so validation accepts the configuration.
#[test]
fn test_cap_above_canvas_is_allowed() {
    let cfg = PackerConfig {
        max_width: 64,
        max_height: 64,
        grid_size: 48,
        max_sprite_width: 96,
        max_sprite_height: 96,
    };
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_builder() {
    let cfg = PackerConfig::builder()
        .with_max_dimensions(512, 512)
        .grid_size(32)
        .max_sprite_size(64, 64)
        .build();
    assert_eq!((cfg.max_width, cfg.max_height), (512, 512));
    assert_eq!(cfg.grid_size, 32);
    assert_eq!((cfg.max_sprite_width, cfg.max_sprite_height), (64, 64));
    assert_eq!(cfg.cols(), 16);
}

#[test]
fn test_empty_input_pack_sprites() {
    let cfg = PackerConfig::default();
    let inputs: Vec<InputImage> = vec![];

    let result = pack_sprites(inputs, cfg);
    assert!(result.is_err());
    match result {
        Err(TilesetPackerError::Empty) => {}
        _ => panic!("Expected Empty error"),
    }
}

#[test]
fn test_empty_input_pack_layout() {
    let cfg = PackerConfig::default();
    let inputs: Vec<(String, u32, u32)> = vec![];

    let result = pack_layout(inputs, cfg);
    assert!(result.is_err());
    match result {
        Err(TilesetPackerError::Empty) => {}
        _ => panic!("Expected Empty error"),
    }
}

#[test]
fn test_invalid_config_rejected_by_pipeline() {
    let cfg = PackerConfig {
        grid_size: 0,
        ..Default::default()
    };
    let result = pack_layout(vec![("a", 10, 10)], cfg);
    assert!(result.is_err());
}
