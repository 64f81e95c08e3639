use std::net::SocketAddr;
use std::path::PathBuf;

use configs::AppConfig;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

struct TestApp {
    base_url: String,
    data_file: PathBuf,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn cleanup(self) {
        if let Some(dir) = self.data_file.parent() {
            let _ = tokio::fs::remove_dir_all(dir).await;
        }
    }
}

async fn start_server(seed: Option<&str>) -> anyhow::Result<TestApp> {
    // Use an isolated data file per test run
    let data_file = std::env::temp_dir()
        .join(format!("artist_store_e2e_{}", Uuid::new_v4()))
        .join("spotify_artist_data.csv");
    let mut cfg = AppConfig::default();
    cfg.store.path = data_file.clone();
    cfg.normalize_and_validate()?;

    let app = server::startup::build_app(&cfg).await?;
    if let Some(content) = seed {
        tokio::fs::write(&data_file, content).await?;
    }

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url, data_file })
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

#[tokio::test]
async fn e2e_list_on_missing_file_is_empty() -> anyhow::Result<()> {
    let app = start_server(None).await?;
    let res = client().get(app.url("/data")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!([]));
    app.cleanup().await;
    Ok(())
}

#[tokio::test]
async fn e2e_add_on_empty_store_assigns_index_one() -> anyhow::Result<()> {
    let app = start_server(None).await?;
    let res = client().post(app.url("/data/add")).json(&json!({"Artist Name": "Drake"})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let body = res.json::<Value>().await?;
    assert_eq!(body, json!({"Artist Name": "Drake", "Index": "1"}));

    let on_disk = tokio::fs::read_to_string(&app.data_file).await?;
    assert_eq!(on_disk, "Artist Name,Index\r\nDrake,1\r\n");
    app.cleanup().await;
    Ok(())
}

#[tokio::test]
async fn e2e_update_then_get_is_case_insensitive() -> anyhow::Result<()> {
    let app = start_server(Some("Index,Artist Name,Genre\r\n1,Adele,Pop\r\n")).await?;
    let c = client();

    let res = c.put(app.url("/data/update/Adele")).json(&json!({"Genre": "Soul"})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(
        res.json::<Value>().await?,
        json!({"mensagem": "Dados do artista 'Adele' atualizados com sucesso!"})
    );

    let res = c.get(app.url("/data/artist/adele")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({"Index": "1", "Artist Name": "Adele", "Genre": "Soul"}));

    // header order from the file is preserved on rewrite
    let on_disk = tokio::fs::read_to_string(&app.data_file).await?;
    assert_eq!(on_disk, "Index,Artist Name,Genre\r\n1,Adele,Soul\r\n");
    app.cleanup().await;
    Ok(())
}

#[tokio::test]
async fn e2e_duplicate_add_is_rejected_without_mutation() -> anyhow::Result<()> {
    let seed = "Index,Artist Name,Genre\r\n1,Adele,Pop\r\n";
    let app = start_server(Some(seed)).await?;
    let res = client().post(app.url("/data/add")).json(&json!({"Artist Name": "ADELE", "Genre": "Soul"})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?, json!({"erro": "Artista já existe!"}));
    assert_eq!(tokio::fs::read_to_string(&app.data_file).await?, seed);
    app.cleanup().await;
    Ok(())
}

#[tokio::test]
async fn e2e_not_found_paths_return_erro() -> anyhow::Result<()> {
    let app = start_server(Some("Index,Artist Name\r\n1,Adele\r\n")).await?;
    let c = client();
    let not_found = json!({"erro": "Artista não encontrado"});

    let res = c.get(app.url("/data/artist/Nobody")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await?, not_found);

    let res = c.get(app.url("/data/index/42")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    let res = c.put(app.url("/data/update/index/42")).json(&json!({"Genre": "x"})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    let res = c.delete(app.url("/data/delete/Nobody")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await?, not_found);

    let res = c.delete(app.url("/data/delete/index/42")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    app.cleanup().await;
    Ok(())
}

#[tokio::test]
async fn e2e_delete_by_name_removes_all_matches() -> anyhow::Result<()> {
    let app = start_server(Some("Index,Artist Name\r\n1,Adele\r\n2,Drake\r\n3,adele\r\n")).await?;
    let c = client();

    let res = c.delete(app.url("/data/delete/ADELE")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({"mensagem": "Artista 'ADELE' deletado com sucesso!"}));

    let all = c.get(app.url("/data")).send().await?.json::<Value>().await?;
    assert_eq!(all, json!([{"Index": "2", "Artist Name": "Drake"}]));
    app.cleanup().await;
    Ok(())
}

#[tokio::test]
async fn e2e_index_routes_round_trip() -> anyhow::Result<()> {
    let app = start_server(None).await?;
    let c = client();
    for name in ["Adele", "Drake", "Björk"] {
        let res = c.post(app.url("/data/add")).json(&json!({"Artist Name": name, "Genre": "?"})).send().await?;
        assert_eq!(res.status(), HttpStatusCode::CREATED);
    }

    let res = c.get(app.url("/data/index/3")).send().await?;
    assert_eq!(res.json::<Value>().await?["Artist Name"], "Björk");

    let res = c.put(app.url("/data/update/index/2")).json(&json!({"Genre": "Rap", "Unknown": 1})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(
        res.json::<Value>().await?,
        json!({"mensagem": "Dados do artista com índice '2' atualizados com sucesso!"})
    );
    let drake = c.get(app.url("/data/index/2")).send().await?.json::<Value>().await?;
    assert_eq!(drake, json!({"Index": "2", "Artist Name": "Drake", "Genre": "Rap"}));

    let res = c.delete(app.url("/data/delete/index/1")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({"mensagem": "Artista com índice '1' deletado com sucesso!"}));

    // the next index follows the current maximum, not the record count
    let res = c.post(app.url("/data/add")).json(&json!({"Artist Name": "Sade"})).send().await?;
    assert_eq!(res.json::<Value>().await?["Index"], "4");

    let names: Vec<Value> = c
        .get(app.url("/data"))
        .send()
        .await?
        .json::<Vec<Value>>()
        .await?
        .into_iter()
        .map(|r| r["Artist Name"].clone())
        .collect();
    assert_eq!(names, vec![json!("Drake"), json!("Björk"), json!("Sade")]);
    app.cleanup().await;
    Ok(())
}

#[tokio::test]
async fn e2e_add_without_artist_name_is_bad_request() -> anyhow::Result<()> {
    let app = start_server(None).await?;
    let res = client().post(app.url("/data/add")).json(&json!({"Genre": "Pop"})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert!(res.json::<Value>().await?["erro"].is_string());
    assert!(tokio::fs::metadata(&app.data_file).await.is_err());
    app.cleanup().await;
    Ok(())
}
