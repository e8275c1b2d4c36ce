use std::io::Write;

use mockito::{Matcher, Server};
use pastebiner::api::{Form, HttpTransport, PastebinClient, Transport};
use pastebiner::config::Config;
use pastebiner::upload::UploadRequest;
use pastebiner::workflow::run_upload;
use pastebiner::PastebinError;

fn config_for(server: &Server) -> Config {
    let api_url = format!("{}/api/api_post.php", server.url());
    let login_url = format!("{}/api/api_login.php", server.url());
    let raw_url = format!("{}/raw", server.url());
    Config::from_vars(move |name| match name {
        "APILOGIN" => Some("alice".into()),
        "APIDEVKEY" => Some("devkey".into()),
        "APIPASSWORD" => Some("s3cret & more".into()),
        "APIURL" => Some(api_url.clone()),
        "APILOGINURL" => Some(login_url.clone()),
        "APIRAWURL" => Some(raw_url.clone()),
        _ => None,
    })
    .expect("config should load")
}

fn form(fields: &[(&str, &str)]) -> Matcher {
    Matcher::AllOf(
        fields
            .iter()
            .map(|(k, v)| Matcher::UrlEncoded(k.to_string(), v.to_string()))
            .collect(),
    )
}

#[test]
fn login_posts_form_and_returns_body_verbatim() {
    let mut server = Server::new();
    let login = server
        .mock("POST", "/api/api_login.php")
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body(form(&[
            ("api_dev_key", "devkey"),
            ("api_user_name", "alice"),
            ("api_user_password", "s3cret & more"),
        ]))
        .with_status(200)
        .with_body("3a8f0c1d9e")
        .create();

    let client = PastebinClient::from_config(config_for(&server)).unwrap();
    assert_eq!(client.login().unwrap(), "3a8f0c1d9e");
    login.assert();
}

#[test]
fn list_status_outside_accepted_set_is_a_request_error() {
    let mut server = Server::new();
    let list = server
        .mock("POST", "/api/api_post.php")
        .match_body(form(&[("api_option", "list"), ("api_result_limit", "50")]))
        .with_status(500)
        .with_body("oops")
        .create();

    let client = PastebinClient::from_config(config_for(&server)).unwrap();
    match client.list_pastes("ukey") {
        Err(PastebinError::Request { status }) => assert_eq!(status, 500),
        other => panic!("unexpected: {other:?}"),
    }
    list.assert();
}

#[test]
fn list_decodes_sibling_pastes() {
    let mut server = Server::new();
    server
        .mock("POST", "/api/api_post.php")
        .match_body(form(&[
            ("api_option", "list"),
            ("api_user_key", "ukey"),
            ("api_dev_key", "devkey"),
        ]))
        .with_status(200)
        .with_body(
            "<paste><paste_key>a</paste_key><paste_title>one</paste_title></paste>\r\n\
             <paste><paste_key>b</paste_key><paste_title>two</paste_title></paste>\r\n",
        )
        .create();

    let client = PastebinClient::from_config(config_for(&server)).unwrap();
    let pastes = client.list_pastes("ukey").unwrap();
    let titles: Vec<&str> = pastes.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, ["one", "two"]);
}

#[test]
fn unreachable_server_is_a_transport_error() {
    let transport = HttpTransport::new().unwrap();
    // port 9 (discard) on localhost is not expected to accept connections
    let err = transport
        .post_form("http://127.0.0.1:9/api", &Form::new().text("api_option", "list"))
        .unwrap_err();
    assert!(matches!(err, PastebinError::Transport { .. }));
}

#[test]
fn upload_with_no_existing_pastes_creates_directly() {
    let mut server = Server::new();
    let list = server
        .mock("POST", "/api/api_post.php")
        .match_body(form(&[("api_option", "list")]))
        .with_status(200)
        .with_body("")
        .create();
    let create = server
        .mock("POST", "/api/api_post.php")
        .match_body(form(&[
            ("api_option", "paste"),
            ("api_paste_name", "readme"),
            ("api_paste_format", "md"),
            ("api_paste_code", "hello"),
            ("api_paste_private", "0"),
            ("api_paste_expire_date", "N"),
        ]))
        .with_status(200)
        .with_body("https://pastebin.com/AbCdEf12")
        .create();
    let delete = server
        .mock("POST", "/api/api_post.php")
        .match_body(form(&[("api_option", "delete")]))
        .expect(0)
        .create();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("readme.md");
    std::fs::File::create(&path)
        .unwrap()
        .write_all(b"hello")
        .unwrap();

    let client = PastebinClient::from_config(config_for(&server)).unwrap();
    let request = UploadRequest::from_path(&path, client.config()).unwrap();
    let mut never = |prompt: &str| -> bool { panic!("unexpected prompt: {prompt}") };
    let report = run_upload(&client, "ukey", &request, &mut never).unwrap();

    assert!(report.deletions.is_empty());
    assert_eq!(report.response.status, 200);
    assert_eq!(report.response.body, "https://pastebin.com/AbCdEf12");
    list.assert();
    create.assert();
    delete.assert();
}

#[test]
fn non_utf8_file_is_sent_byte_for_byte() {
    let mut server = Server::new();
    server
        .mock("POST", "/api/api_post.php")
        .match_body(form(&[("api_option", "list")]))
        .with_status(200)
        .with_body("No pastes found.")
        .create();
    let create = server
        .mock("POST", "/api/api_post.php")
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body(Matcher::Regex(
            "(^|&)api_paste_code=caf%E9(&|$)".to_string(),
        ))
        .with_status(200)
        .with_body("https://pastebin.com/Latin1xx")
        .create();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("latin1.txt");
    std::fs::File::create(&path)
        .unwrap()
        .write_all(&[b'c', b'a', b'f', 0xE9])
        .unwrap();

    let client = PastebinClient::from_config(config_for(&server)).unwrap();
    let request = UploadRequest::from_path(&path, client.config()).unwrap();
    let report = run_upload(&client, "ukey", &request, &mut |_: &str| false).unwrap();

    assert_eq!(report.response.body, "https://pastebin.com/Latin1xx");
    create.assert();
}

#[test]
fn info_decodes_user_details() {
    let mut server = Server::new();
    server
        .mock("POST", "/api/api_post.php")
        .match_body(form(&[("api_option", "userdetails"), ("api_user_key", "ukey")]))
        .with_status(200)
        .with_body(
            "<user>\r\n<user_name>alice</user_name>\r\n\
             <user_location>Berlin</user_location>\r\n</user>",
        )
        .create();

    let client = PastebinClient::from_config(config_for(&server)).unwrap();
    let info = client.user_details("ukey").unwrap();
    assert_eq!(info.name, "alice");
    assert_eq!(info.location, "Berlin");
}

#[test]
fn show_falls_back_to_raw_endpoint() {
    let mut server = Server::new();
    server
        .mock("POST", "/api/api_post.php")
        .match_body(form(&[("api_option", "show_paste"), ("api_paste_key", "Xy12")]))
        .with_status(200)
        .with_body("Bad API request, invalid permission to view this paste or invalid api_paste_key")
        .create();
    let raw = server
        .mock("GET", "/raw/Xy12")
        .with_status(200)
        .with_body("public text")
        .create();

    let client = PastebinClient::from_config(config_for(&server)).unwrap();
    assert_eq!(client.show_paste("ukey", "Xy12").unwrap(), "public text");
    raw.assert();
}
