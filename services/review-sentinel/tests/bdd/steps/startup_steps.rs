//! BDD step definitions for startup configuration feature

use cucumber::{given, then, when};

use review_sentinel::{Config, Credentials};

use crate::world::ReviewWorld;

#[given(expr = "the environment variable {string} is set to {string}")]
fn env_var(world: &mut ReviewWorld, name: String, value: String) {
    world.env.push((name, value));
}

#[given(expr = "a configuration with a polling interval of {int} seconds")]
fn config_with_interval(world: &mut ReviewWorld, seconds: u64) {
    let mut config = Config::default();
    config.polling.interval_seconds = seconds;
    world.config = Some(config);
}

#[when("credentials are loaded")]
fn load_credentials(world: &mut ReviewWorld) {
    let env = world.env.clone();
    world.startup_result = Some(
        Credentials::from_lookup(|name| {
            env.iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
        })
        .map(|creds| creds.telegram_chat_id),
    );
}

#[when("the service is started")]
async fn start_service(world: &mut ReviewWorld) {
    let config = world.config.clone().expect("config not set");
    let credentials = Credentials {
        practicum_token: "p-token".to_string(),
        telegram_token: "t-token".to_string(),
        telegram_chat_id: "1".to_string(),
    };
    world.startup_result = Some(
        review_sentinel::run(config, credentials)
            .await
            .map(|()| String::new()),
    );
}

#[then(expr = "credentials should be available for chat {string}")]
fn credentials_available(world: &mut ReviewWorld, chat_id: String) {
    let result = world.startup_result.as_ref().expect("no result");
    assert_eq!(*result.as_ref().unwrap(), chat_id);
}

#[then(expr = "startup should abort with a configuration error mentioning {string}")]
fn startup_aborts(world: &mut ReviewWorld, needle: String) {
    let result = world.startup_result.as_ref().expect("no result");
    let err = result.as_ref().unwrap_err();
    assert!(err.is_fatal(), "{err}");
    assert!(err.to_string().contains(&needle), "{err}");
}
