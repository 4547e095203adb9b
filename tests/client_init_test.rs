use httpmock::prelude::*;
use ride_backend::{
    BackendConfig, BackendError, BookingQuery, BookingRepository, RestBookingStore, Service,
    SharedClient, TomlConfig,
};
use std::collections::HashMap;
use std::io::Write;
use tempfile::NamedTempFile;

fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_present_configuration_yields_one_handle() {
    let vars = env(&[
        ("SUPABASE_URL", "https://project.supabase.co"),
        ("SUPABASE_ANON_KEY", "anon"),
    ]);
    let shared = SharedClient::new();

    let first = shared
        .get_or_try_init(|| BackendConfig::from_lookup(|name| vars.get(name).cloned()))
        .unwrap();
    let second = shared
        .get_or_try_init(|| panic!("client must not be rebuilt"))
        .unwrap();

    assert!(std::ptr::eq(first, second));
    assert_eq!(
        first.service_url(Service::Rest).unwrap().as_str(),
        "https://project.supabase.co/rest/v1/"
    );
}

#[test]
fn test_missing_or_empty_configuration_yields_no_handle() {
    let cases = [
        env(&[("SUPABASE_ANON_KEY", "anon")]),
        env(&[("SUPABASE_URL", "https://project.supabase.co")]),
        env(&[("SUPABASE_URL", ""), ("SUPABASE_ANON_KEY", "anon")]),
        env(&[("SUPABASE_URL", "https://project.supabase.co"), ("SUPABASE_ANON_KEY", "")]),
        env(&[]),
    ];

    for vars in cases {
        let shared = SharedClient::new();
        let err = shared
            .get_or_try_init(|| BackendConfig::from_lookup(|name| vars.get(name).cloned()))
            .unwrap_err();

        assert!(matches!(err, BackendError::MissingConfiguration { .. }), "{:?}", vars);
        assert!(shared.get().is_none());
    }
}

#[tokio::test]
async fn test_toml_configured_client_sends_credentials() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/rest/v1/trips")
                .header("apikey", "file-key")
                .header("authorization", "Bearer file-key");
            then.status(200).json_body(serde_json::json!([]));
        })
        .await;

    let mut temp_file = NamedTempFile::new().unwrap();
    write!(
        temp_file,
        "[backend]\nurl = \"{}\"\nanon_key = \"file-key\"\ntimeout_seconds = 5\n\n[bookings]\ntable = \"trips\"\n",
        server.base_url()
    )
    .unwrap();

    let config = TomlConfig::from_file(temp_file.path()).unwrap();
    let shared = SharedClient::new();
    let client = shared.get_or_try_init(|| config.backend_config()).unwrap();
    let store = RestBookingStore::with_table(client, config.bookings_table());

    let rows = store.list(&BookingQuery::default()).await.unwrap();

    mock.assert_async().await;
    assert!(rows.is_empty());
    assert_eq!(store.table(), "trips");
}
