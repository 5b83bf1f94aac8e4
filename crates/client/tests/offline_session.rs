use std::path::PathBuf;
use std::time::Duration;

use bot_client::{BotFile, ClientConfig};

fn bundled_data() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn bundled_world_runs_and_shuts_down() {
    let config = ClientConfig {
        data_dir: bundled_data(),
        seed: Some(7),
        ..ClientConfig::default()
    };
    let mut file = BotFile::load(&config.config_path()).expect("bundled config loads");
    file.offline.cooldown_ms = 0;
    file.runtime.idle_poll_ms = 10;
    file.runtime.policy_interval_ms = 20;

    let session = bot_client::start(&config, file).await.expect("bot starts");
    assert_eq!(session.runtime.characters().len(), 3);

    tokio::time::sleep(Duration::from_millis(500)).await;
    let busy = session
        .runtime
        .characters()
        .iter()
        .filter(|character| !session.server.actions(character.name()).is_empty())
        .count();
    assert!(busy > 0, "no character acted");

    session.runtime.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn missing_world_is_reported() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = ClientConfig {
        data_dir: dir.path().to_path_buf(),
        ..ClientConfig::default()
    };
    let file = BotFile::load(&bundled_data().join("bot.toml")).expect("bundled config loads");

    let error = bot_client::start(&config, file)
        .await
        .err()
        .expect("empty directory has no world");
    assert!(format!("{error:#}").contains("loading world"));
}
