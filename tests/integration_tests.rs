use httpmock::prelude::*;
use meal_map::domain::ports::MapDataSource;
use meal_map::{CliConfig, DataLoader, HtmlRenderer, LocalStorage, MapEngine, MapError, TomlConfig};
use meal_map::domain::settings::RenderSettings;
use tempfile::TempDir;

fn china_geometry() -> serde_json::Value {
    serde_json::json!({
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"name": "北京"}, "geometry": {"type": "Polygon", "coordinates": []}},
            {"type": "Feature", "properties": {"name": "上海"}, "geometry": {"type": "Polygon", "coordinates": []}}
        ]
    })
}

fn cli_config(dataset: String, geometry_url: String, output_path: &str) -> CliConfig {
    CliConfig {
        dataset,
        geometry_url,
        output_path: output_path.to_string(),
        timeout_secs: Some(5),
        ..CliConfig::default()
    }
}

#[tokio::test]
async fn test_end_to_end_with_local_dataset() {
    let temp_dir = TempDir::new().unwrap();
    let base = temp_dir.path().to_str().unwrap().to_string();

    std::fs::write(
        temp_dir.path().join("friends_data.json"),
        serde_json::json!([
            {"Name": "小明", "Location1": "116.4074,39.9042", "Location2": "22.5431,114.0579", "city1": "北京", "city2": "深圳"},
            {"Name": "小红", "Location1": "oops", "Location2": "121.4737,31.2304", "city1": "?", "city2": "上海"},
            {"Name": "小李", "Location1": "500,500", "city1": "nowhere"}
        ])
        .to_string(),
    )
    .unwrap();

    let server = MockServer::start();
    let geometry_mock = server.mock(|when, then| {
        when.method(GET).path("/china.json");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(china_geometry());
    });

    let config = cli_config(
        "friends_data.json".to_string(),
        server.url("/china.json"),
        &base,
    );
    let loader = DataLoader::new(LocalStorage::new(&base), config).unwrap();
    let engine = MapEngine::new(loader, "mapContainer", "china", RenderSettings::default());

    let (renderer, summary) = engine.run(HtmlRenderer::new()).await.unwrap();
    geometry_mock.assert();

    assert_eq!(summary.records_loaded, 3);
    assert_eq!(summary.points_resolved, 3);
    assert_eq!(summary.fields_skipped, 2);
    assert_eq!(summary.points_displayed, 5);

    let option = renderer.port().option();
    let data = option["series"][0]["data"].as_array().unwrap();
    assert_eq!(data[1]["value"], serde_json::json!([114.0579, 22.5431]));
    assert_eq!(data[1]["city"], "深圳");
    assert_eq!(data[1]["type"], "次要城市");
    assert_eq!(data[2]["name"], "小红");

    let storage = LocalStorage::new(&base);
    renderer.port().publish(&storage, "meal_map.html").await.unwrap();

    let html = std::fs::read_to_string(temp_dir.path().join("meal_map.html")).unwrap();
    assert!(html.contains("<div id=\"mapContainer\"></div>"));
    assert!(html.contains("echarts.registerMap(\"china\""));
    for name in ["小明", "小红", "测试点1", "测试点2"] {
        assert!(html.contains(name), "missing {name}");
    }
    assert!(!html.contains("小李"));
}

#[tokio::test]
async fn test_dataset_404_still_renders_diagnostics() {
    let temp_dir = TempDir::new().unwrap();
    let base = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/china.json");
        then.status(200).json_body(china_geometry());
    });
    let dataset_mock = server.mock(|when, then| {
        when.method(GET).path("/friends_data.json");
        then.status(404);
    });

    let config = cli_config(
        server.url("/friends_data.json"),
        server.url("/china.json"),
        &base,
    );
    let loader = DataLoader::new(LocalStorage::new(&base), config).unwrap();
    let engine = MapEngine::new(loader, "mapContainer", "china", RenderSettings::default());

    let (renderer, summary) = engine.run(HtmlRenderer::new()).await.unwrap();
    dataset_mock.assert();

    assert_eq!(summary.records_loaded, 0);
    assert_eq!(summary.points_displayed, 2);

    let data = renderer.port().option()["series"][0]["data"].as_array().unwrap().clone();
    let names: Vec<&str> = data.iter().map(|d| d["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["测试点1", "测试点2"]);
}

#[tokio::test]
async fn test_geometry_failure_aborts_run() {
    let temp_dir = TempDir::new().unwrap();
    let base = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/china.json");
        then.status(500);
    });
    let dataset_mock = server.mock(|when, then| {
        when.method(GET).path("/friends_data.json");
        then.status(200).json_body(serde_json::json!([]));
    });

    let config = cli_config(
        server.url("/friends_data.json"),
        server.url("/china.json"),
        &base,
    );
    let loader = DataLoader::new(LocalStorage::new(&base), config).unwrap();
    let engine = MapEngine::new(loader, "mapContainer", "china", RenderSettings::default());

    let result = engine.run(HtmlRenderer::new()).await;
    assert!(matches!(result, Err(MapError::HttpStatusError { status: 500, .. })));
    dataset_mock.assert_hits(0);
}

#[tokio::test]
async fn test_toml_config_drives_loader() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/friends.json");
        then.status(200).json_body(serde_json::json!([
            {"Name": "阿强", "Location1": "30.5728,104.0668", "city1": "成都"}
        ]));
    });

    let toml_content = format!(
        r#"
[source]
dataset = "{}"
geometry_url = "{}"

[render]
title = "Friends"

[output]
path = "./unused"
"#,
        server.url("/friends.json"),
        server.url("/china.json")
    );

    let config = TomlConfig::from_toml_str(&toml_content).unwrap();
    let loader = DataLoader::new(LocalStorage::new("."), config).unwrap();

    let records = loader.load_dataset().await;
    assert_eq!(records.len(), 1);

    let resolution = meal_map::core::resolver::resolve_points(&records);
    let position = resolution.points[0].position;
    assert_eq!((position.lng(), position.lat()), (104.0668, 30.5728));
}
