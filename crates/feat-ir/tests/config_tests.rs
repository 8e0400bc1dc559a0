use feat_ir::config::{ConfigError, ConfigFile};
use feat_ir::types::{Domain, KindTag};
use serde_json::json;

#[test]
fn test_parse_config_from_file() {
    let json = include_str!("fixtures/nested_config.json");
    let config = ConfigFile::parse(json).unwrap();
    assert_eq!(config.func_name, "merge_counts");
    assert_eq!(config.num_random, 10);
    assert_eq!(config.seed, 42);

    let nodes = config.nodes().unwrap();
    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[0].tag(), KindTag::Dict);
    assert_eq!(nodes[1].exhaustive(), &Domain::Int(vec![0, 1]));
    assert_eq!(
        nodes[2].random(),
        &Domain::Float(vec![-2.0, -1.0, 0.0, 1.0, 2.0])
    );
    assert!(nodes.iter().all(|n| n.is_populated()));
}

#[test]
fn test_parse_invalid_json() {
    let result = ConfigFile::parse("not json at all");
    assert!(matches!(result, Err(ConfigError::Json(_))));
}

#[test]
fn test_missing_key_rejected() {
    let json = json!({
        "fname": "f",
        "types": ["int"],
        "exhaustive domain": ["[1]"],
        "num random": 1
    });
    assert!(ConfigFile::parse(&json.to_string()).is_err());
}

#[test]
fn test_negative_num_random_rejected() {
    let json = json!({
        "fname": "f",
        "types": ["int"],
        "exhaustive domain": ["[1]"],
        "random domain": ["[1]"],
        "num random": -3
    });
    assert!(matches!(
        ConfigFile::parse(&json.to_string()),
        Err(ConfigError::Json(_))
    ));
}

#[test]
fn test_length_mismatch_rejected() {
    let json = json!({
        "fname": "f",
        "types": ["int", "bool"],
        "exhaustive domain": ["[1]", "[0]"],
        "random domain": ["[1]"],
        "num random": 0
    });
    let err = ConfigFile::parse(&json.to_string()).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::LengthMismatch {
            types: 2,
            exhaustive: 2,
            random: 1
        }
    ));
}

#[test]
fn test_bad_domain_surfaces_spec_error() {
    let json = json!({
        "fname": "f",
        "types": ["list(int)"],
        "exhaustive domain": ["1~2"],
        "random domain": ["1([1])"],
        "num random": 0,
        "seed": 7
    });
    let config = ConfigFile::parse(&json.to_string()).unwrap();
    assert_eq!(config.seed, 7);
    assert!(matches!(config.nodes(), Err(ConfigError::Spec(_))));
}
