use std::net::SocketAddr;

use agro_server::{AppState, Config, build_router};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

async fn spawn_app() -> SocketAddr {
    let state = AppState::in_memory(&Config::default()).expect("state");
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    addr
}

async fn send_raw(
    addr: SocketAddr,
    method: &str,
    path: &str,
    headers: &[(&str, &str)],
    body: Option<&str>,
) -> (u16, String, String) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let mut req = format!("{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n");
    if let Some(payload) = body {
        req.push_str("Content-Type: application/json\r\n");
        req.push_str(&format!("Content-Length: {}\r\n", payload.len()));
    }
    for (k, v) in headers {
        req.push_str(&format!("{k}: {v}\r\n"));
    }
    req.push_str("\r\n");
    if let Some(payload) = body {
        req.push_str(payload);
    }
    stream
        .write_all(req.as_bytes())
        .await
        .expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("status");
    (status, head.to_string(), body.to_string())
}

fn json(body: &str) -> serde_json::Value {
    serde_json::from_str(body).expect("json body")
}

const ALICE: &[(&str, &str)] = &[("x-user-id", "alice")];
const BOB: &[(&str, &str)] = &[("x-user-id", "bob")];
const ROOT: &[(&str, &str)] = &[("x-user-id", "root"), ("x-user-role", "superadmin")];

#[tokio::test]
async fn hello_world_and_request_id_echo() {
    let addr = spawn_app().await;
    let (status, head, body) = send_raw(
        addr,
        "GET",
        "/hello-world",
        &[("x-request-id", "req-42")],
        None,
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body, "Hello World!");
    assert!(head.to_lowercase().contains("x-request-id: req-42"));
}

#[tokio::test]
async fn missing_user_header_is_unauthorized() {
    let addr = spawn_app().await;
    let (status, _, body) = send_raw(addr, "GET", "/agents", &[], None).await;
    assert_eq!(status, 401);
    assert_eq!(json(&body)["statusCode"], 401);
}

#[tokio::test]
async fn agent_lifecycle_over_http() {
    let addr = spawn_app().await;

    let (status, _, body) = send_raw(
        addr,
        "POST",
        "/agents",
        ALICE,
        Some(r#"{"name":"Ravi","phone":"9000000001"}"#),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(json(&body)["message"], "Agent created successfully!");

    send_raw(
        addr,
        "POST",
        "/agents",
        ALICE,
        Some(r#"{"name":"Meena","phone":"9000000002"}"#),
    )
    .await;

    let (status, _, body) = send_raw(addr, "GET", "/agents", ALICE, None).await;
    assert_eq!(status, 200);
    let agents = json(&body);
    assert_eq!(agents[0]["code"], "AGNT001");
    assert_eq!(agents[1]["code"], "AGNT002");
    assert_eq!(agents[0]["owner"], "alice");
    assert_eq!(agents[0]["status"], true);
    let id = agents[0]["id"].as_str().expect("id").to_string();

    let (status, _, body) = send_raw(addr, "GET", "/agents?search=meena", ALICE, None).await;
    assert_eq!(status, 200);
    assert_eq!(json(&body).as_array().map(Vec::len), Some(1));

    let (status, _, body) = send_raw(
        addr,
        "PATCH",
        &format!("/agents/{id}"),
        ALICE,
        Some(r#"{"name":"Ravi Kumar"}"#),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(json(&body)["message"], "Agent updated successfully!");

    let status_body = format!(r#"{{"id":"{id}","status":false}}"#);
    let (status, _, body) =
        send_raw(addr, "POST", "/agents/status", ALICE, Some(&status_body)).await;
    assert_eq!(status, 200);
    assert_eq!(json(&body)["message"], "Agent status updated successfully!");

    let (status, _, body) = send_raw(addr, "GET", &format!("/agents/{id}"), ALICE, None).await;
    assert_eq!(status, 200);
    let agent = json(&body);
    assert_eq!(agent["name"], "Ravi Kumar");
    assert_eq!(agent["status"], false);
    assert_eq!(agent["updatedBy"], "alice");

    // 其他用户看不到该记录
    let (status, _, _) = send_raw(addr, "GET", &format!("/agents/{id}"), BOB, None).await;
    assert_eq!(status, 404);

    let (status, _, body) =
        send_raw(addr, "DELETE", &format!("/agents/{id}"), ALICE, None).await;
    assert_eq!(status, 200);
    assert_eq!(json(&body)["message"], "Agent deleted successfully!");

    // 删除后编码不复用
    send_raw(
        addr,
        "POST",
        "/agents",
        ALICE,
        Some(r#"{"name":"Kiran","phone":"9000000003"}"#),
    )
    .await;
    let (_, _, body) = send_raw(addr, "GET", "/agents?search=kiran", ALICE, None).await;
    assert_eq!(json(&body)[0]["code"], "AGNT003");
}

#[tokio::test]
async fn duplicate_phone_is_conflict_naming_the_field() {
    let addr = spawn_app().await;
    let payload = r#"{"name":"Ravi","phone":"9000000001"}"#;
    send_raw(addr, "POST", "/buyers", ALICE, Some(r#"{"name":"Ravi","phone":"9000000001","address":"x"}"#)).await;
    let (status, _, body) = send_raw(
        addr,
        "POST",
        "/buyers",
        ALICE,
        Some(r#"{"name":"Other","phone":"9000000001","address":"y"}"#),
    )
    .await;
    assert_eq!(status, 409);
    assert_eq!(json(&body)["field"], "phone");
    assert_eq!(json(&body)["message"], "Phone number already exists");

    let (status, _, _) = send_raw(addr, "POST", "/agents", ALICE, Some(payload)).await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn malformed_payload_and_id_are_bad_requests() {
    let addr = spawn_app().await;
    let (status, _, _) = send_raw(addr, "POST", "/agents", ALICE, Some(r#"{"name":"#)).await;
    assert_eq!(status, 400);

    let (status, _, _) = send_raw(addr, "POST", "/agents", ALICE, Some(r#"{"name":"x"}"#)).await;
    assert_eq!(status, 400);

    let (status, _, _) = send_raw(addr, "GET", "/agents/not-a-uuid", ALICE, None).await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn stock_batch_and_dashboard() {
    let addr = spawn_app().await;
    for number in ["M-1", "M-2"] {
        let payload = format!(r#"{{"machineNumber":"{number}","floor":"1"}}"#);
        let (status, _, _) = send_raw(addr, "POST", "/machines", ALICE, Some(&payload)).await;
        assert_eq!(status, 200);
    }

    let (status, _, body) = send_raw(
        addr,
        "POST",
        "/stock",
        ALICE,
        Some(
            r#"[{"serialNumber":"SN-1","machine":"M-1","meter":10,"type":"cotton"},
                {"serialNumber":"SN-2","machine":"M-7","meter":5,"type":"silk"}]"#,
        ),
    )
    .await;
    assert_eq!(status, 404);
    assert_eq!(json(&body)["message"], "Machine numbers M-7 not found");

    let (status, _, body) = send_raw(
        addr,
        "POST",
        "/stock",
        ALICE,
        Some(
            r#"[{"serialNumber":"SN-1","machine":"M-1","meter":10,"type":"cotton"},
                {"serialNumber":"SN-2","machine":"M-2","meter":5,"type":"silk"}]"#,
        ),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(json(&body)["message"], "Stock created successfully!");

    let (status, _, body) = send_raw(addr, "GET", "/stock?search=M-2", ALICE, None).await;
    assert_eq!(status, 200);
    let stock = json(&body);
    assert_eq!(stock.as_array().map(Vec::len), Some(1));
    assert_eq!(stock[0]["machine"]["machineNumber"], "M-2");
    assert_eq!(stock[0]["type"], "silk");

    let (status, _, body) = send_raw(addr, "GET", "/dashboard/counts", ALICE, None).await;
    assert_eq!(status, 200);
    let counts = json(&body);
    assert_eq!(counts["machineCount"], 2);
    assert_eq!(counts["agentCount"], 0);

    // 超级管理员的计数同样只含自己的记录，但列表可见全部
    let (_, _, body) = send_raw(addr, "GET", "/dashboard/counts", ROOT, None).await;
    assert_eq!(json(&body)["machineCount"], 0);
    let (_, _, body) = send_raw(addr, "GET", "/machines", ROOT, None).await;
    assert_eq!(json(&body).as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn goods_embed_buyer_until_buyer_is_deleted() {
    let addr = spawn_app().await;
    send_raw(
        addr,
        "POST",
        "/buyers",
        ALICE,
        Some(r#"{"name":"Lakshmi Traders","phone":"9000000010","address":"Erode"}"#),
    )
    .await;
    let (_, _, body) = send_raw(addr, "GET", "/buyers", ALICE, None).await;
    let buyer_id = json(&body)[0]["id"].as_str().expect("buyer id").to_string();

    let goods = format!(
        r#"{{"productName":"Cotton bales","weight":"100","rate":"40","gstNo":"33AAA","buyer":"{buyer_id}"}}"#
    );
    let (status, _, body) = send_raw(addr, "POST", "/goods", ALICE, Some(&goods)).await;
    assert_eq!(status, 200);
    assert_eq!(json(&body)["message"], "Goods created successfully!");

    let (status, _, body) = send_raw(addr, "POST", "/goods", ALICE, Some(&goods)).await;
    assert_eq!(status, 409);
    assert_eq!(json(&body)["message"], "GST number already exists");

    let (status, _, body) = send_raw(addr, "GET", "/goods", ALICE, None).await;
    assert_eq!(status, 200);
    let list = json(&body);
    assert_eq!(list[0]["buyer"]["name"], "Lakshmi Traders");
    let goods_id = list[0]["id"].as_str().expect("goods id").to_string();

    let (status, _, _) =
        send_raw(addr, "DELETE", &format!("/buyers/{buyer_id}"), ALICE, None).await;
    assert_eq!(status, 200);

    let (status, _, body) =
        send_raw(addr, "GET", &format!("/goods/{goods_id}"), ALICE, None).await;
    assert_eq!(status, 200);
    let view = json(&body);
    assert!(view["buyer"].is_null());
    assert_eq!(view["code"], "GDS001");
}
