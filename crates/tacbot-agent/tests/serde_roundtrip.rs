#![cfg(feature = "serde")]

use tacbot_agent::BotConfig;

#[test]
fn bot_config_roundtrips_through_json() {
    let mut config = BotConfig::default();
    config.aim.accuracy = 0.5;
    config.aim.hitbox_weights.insert("hand_l".to_string(), 0.01);
    config.shooting.wait_for_reload = true;

    let json = serde_json::to_string(&config).expect("serialize");
    let back: BotConfig = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, config);
}

#[test]
fn missing_fields_fall_back_to_defaults() {
    let config: BotConfig =
        serde_json::from_str(r#"{ "aim": { "accuracy": 0.9 }, "shooting": { "burst_max": 3 } }"#)
            .expect("deserialize");
    assert_eq!(config.aim.accuracy, 0.9);
    assert_eq!(config.aim.turn_rate, BotConfig::default().aim.turn_rate);
    assert_eq!(config.shooting.burst_max, 3);
    assert_eq!(config.shooting.burst_min, 2);
    assert_eq!(config.validate(), Ok(()));
}
