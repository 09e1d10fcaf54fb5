use std::sync::Mutex;
use std::time::Duration;

use label_core::LabelFields;
use label_desk::{ClientError, Session, StoreClient, lock_session, refresh_once};
use label_server::{AppState, build_router};
use tokio::net::TcpListener;

async fn spawn_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let app = build_router(AppState::default());
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}")
}

fn client(base: &str) -> StoreClient {
    StoreClient::new(base, Duration::from_secs(3)).expect("client")
}

fn door(room: &str, quantity: u32) -> LabelFields {
    LabelFields::new(room, "Porta", "0700", "2100", quantity)
}

async fn cli(args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["label-desk"];
    argv.extend_from_slice(args);
    label_desk::run(argv).await
}

#[tokio::test]
async fn client_round_trip_against_store() {
    let base = spawn_server().await;
    let c = client(&format!("{base}/"));
    assert_eq!(c.base_url(), base);

    let a = c.create(&door("Sala", 2)).await.unwrap();
    let b = c.create(&door("Quarto", 1)).await.unwrap();
    assert_eq!((a, b), (0, 1));

    c.update(a, &door("Cozinha", 3)).await.unwrap();
    let listed = c.list().await.unwrap();
    assert_eq!(listed.iter().map(|r| r.id).collect::<Vec<_>>(), vec![0, 1]);
    assert_eq!(listed[0].room(), "Cozinha");
    assert_eq!(listed[0].quantity(), 3);

    c.delete(b).await.unwrap();
    assert!(matches!(c.delete(b).await, Err(ClientError::NotFound(1))));
    assert!(matches!(
        c.update(42, &door("x", 1)).await,
        Err(ClientError::NotFound(42))
    ));

    let created = c
        .import(&[door("Hall", 1), door("Copa", 0)])
        .await
        .unwrap();
    assert_eq!(created.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2, 3]);

    c.clear().await.unwrap();
    assert!(c.list().await.unwrap().is_empty());
    assert_eq!(c.create(&door("Sala", 1)).await.unwrap(), 4);
}

#[tokio::test]
async fn unreachable_store_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let c = StoreClient::new(&format!("http://{addr}"), Duration::from_millis(500)).unwrap();
    assert!(matches!(c.list().await, Err(ClientError::Transport(_))));

    let session = Mutex::new(Session::new());
    assert!(!refresh_once(&c, &session, &mut |_: &Session| {}).await);
    assert_eq!(lock_session(&session).refresh_count(), 0);
}

#[tokio::test]
async fn cli_add_edit_and_export() {
    let base = spawn_server().await;
    let out = tempfile::tempdir().unwrap();
    let dir = out.path().to_str().unwrap();

    cli(&[
        "--server", &base, "add", "--room", "Banheiro", "--part", "Porta toalha", "--dim1",
        "0300", "--dim2", "0500", "--quantity", "20",
    ])
    .await
    .unwrap();

    let err = cli(&["--server", &base, "add", "--room", "Sala", "--quantity=-1"])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("negative"), "{err}");

    cli(&["--server", &base, "edit", "0", "--quantity", "19"])
        .await
        .unwrap();
    assert!(cli(&["--server", &base, "edit", "7", "--room", "x"]).await.is_err());
    assert!(cli(&["--server", &base, "edit", "0", "--room", "  "]).await.is_err());

    let stored = client(&base).list().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].quantity(), 19);
    assert_eq!(stored[0].part(), "Porta toalha");

    cli(&["--server", &base, "export", "--dir", dir, "--no-open"])
        .await
        .unwrap();
    cli(&["--server", &base, "export", "--dir", dir, "--no-open"])
        .await
        .unwrap();
    assert!(out.path().join("etiquetas001.pdf").is_file());
    assert!(out.path().join("etiquetas002.pdf").is_file());

    let preview = out.path().join("page2.svg");
    cli(&[
        "--server",
        &base,
        "preview",
        "--page",
        "2",
        "--output",
        preview.to_str().unwrap(),
    ])
    .await
    .unwrap();
    assert!(std::fs::read_to_string(&preview).unwrap().contains("Banheiro"));
}

#[tokio::test]
async fn cli_export_of_empty_store_writes_nothing() {
    let base = spawn_server().await;
    let out = tempfile::tempdir().unwrap();
    let dir = out.path().to_str().unwrap();

    assert!(
        cli(&["--server", &base, "export", "--dir", dir, "--no-open"])
            .await
            .is_err()
    );
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn cli_import_recognition_answer() {
    let base = spawn_server().await;
    let tmp = tempfile::tempdir().unwrap();
    let answer = tmp.path().join("answer.txt");
    std::fs::write(
        &answer,
        "Segue a lista:\n[{\"comodo\": \"Cozinha\", \"peca\": \"Tampo\", \"medida1\": \"1200\", \"medida2\": \"0600\", \"quantidade\": \"2\"},\n {\"comodo\": \"Sala\", \"peca\": \"Painel\", \"quantidade\": -1}]\nObrigado!",
    )
    .unwrap();

    cli(&["--server", &base, "import", answer.to_str().unwrap()])
        .await
        .unwrap();

    let stored = client(&base).list().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].room(), "Cozinha");
    assert_eq!(stored[0].dimensions(), "1200 x 0600");
    assert_eq!(stored[0].quantity(), 2);
}
