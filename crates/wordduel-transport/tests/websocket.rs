//! Integration tests for the WebSocket transport.
//!
//! A real listener on an OS-assigned port and a real client, so frames
//! actually cross the network stack.

#[cfg(feature = "websocket")]
mod websocket {
    use std::time::Duration;

    use futures_util::{SinkExt, StreamExt};
    use tokio::io::AsyncWriteExt;
    use tokio_tungstenite::tungstenite::Message;
    use wordduel_transport::{Connection, Transport, WebSocketConnection, WebSocketTransport};

    type ClientWs = tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >;

    async fn connect_client(addr: &str) -> ClientWs {
        let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
            .await
            .expect("client should connect");
        ws
    }

    /// Binds on port 0 and returns the transport plus its address.
    async fn bind() -> (WebSocketTransport, String) {
        let transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport.local_addr().expect("local addr").to_string();
        (transport, addr)
    }

    async fn accept_upgraded(transport: &mut WebSocketTransport) -> WebSocketConnection {
        let pending = transport.accept().await.expect("should accept");
        pending.upgrade().await.expect("should upgrade")
    }

    #[tokio::test]
    async fn test_accept_does_not_wait_for_handshake() {
        let (mut transport, addr) = bind().await;

        // A peer that connects and never speaks.
        let _idle = tokio::net::TcpStream::connect(&addr).await.expect("tcp connect");
        let idle = tokio::time::timeout(Duration::from_secs(1), transport.accept())
            .await
            .expect("accept returned without a handshake")
            .expect("should accept");

        let server_handle = tokio::spawn(async move {
            let pending = transport.accept().await.expect("should accept");
            pending.upgrade().await.expect("should upgrade")
        });
        let _client = connect_client(&addr).await;
        let conn = tokio::time::timeout(Duration::from_secs(1), server_handle)
            .await
            .expect("second peer upgraded while the first stayed silent")
            .unwrap();
        assert!(conn.id().into_inner() > 0);
        assert_eq!(idle.peer_addr().ip().to_string(), "127.0.0.1");
    }

    #[tokio::test]
    async fn test_upgrade_fails_for_non_websocket_peer() {
        let (mut transport, addr) = bind().await;
        let mut raw = tokio::net::TcpStream::connect(&addr).await.expect("tcp connect");
        let pending = transport.accept().await.expect("should accept");

        raw.write_all(b"GET / HTTP/1.1\r\nHost: x\r\n\r\n").await.unwrap();
        assert!(pending.upgrade().await.is_err());
    }

    #[tokio::test]
    async fn test_text_frames_flow_both_ways() {
        let (mut transport, addr) = bind().await;
        let server_handle = tokio::spawn(async move {
            accept_upgraded(&mut transport).await
        });

        let mut client_ws = connect_client(&addr).await;
        let server_conn = server_handle.await.expect("task should complete");
        assert!(server_conn.id().into_inner() > 0);

        server_conn
            .send(br#"{"event":"room:reset","data":{"msg":"reset"}}"#)
            .await
            .expect("send should succeed");

        let msg = client_ws.next().await.unwrap().unwrap();
        assert!(msg.is_text(), "JSON payloads go out as text frames");
        assert_eq!(
            msg.into_text().unwrap().as_str(),
            r#"{"event":"room:reset","data":{"msg":"reset"}}"#,
        );

        client_ws
            .send(Message::Text(r#"{"event":"reset_room"}"#.into()))
            .await
            .unwrap();

        let received = server_conn
            .recv()
            .await
            .expect("recv should succeed")
            .expect("should have data");
        assert_eq!(received, br#"{"event":"reset_room"}"#);

        server_conn.close().await.expect("close should succeed");
    }

    #[tokio::test]
    async fn test_non_utf8_payload_goes_out_binary() {
        let (mut transport, addr) = bind().await;
        let server_handle = tokio::spawn(async move {
            accept_upgraded(&mut transport).await
        });

        let mut client_ws = connect_client(&addr).await;
        let server_conn = server_handle.await.unwrap();

        server_conn.send(&[0xff, 0xfe, 0x00]).await.unwrap();
        let msg = client_ws.next().await.unwrap().unwrap();
        assert!(msg.is_binary());
        assert_eq!(msg.into_data().as_ref(), &[0xff, 0xfe, 0x00]);
    }

    #[tokio::test]
    async fn test_recv_returns_none_on_client_close() {
        let (mut transport, addr) = bind().await;
        let server_handle = tokio::spawn(async move {
            accept_upgraded(&mut transport).await
        });

        let mut client_ws = connect_client(&addr).await;
        let server_conn = server_handle.await.unwrap();

        client_ws.send(Message::Close(None)).await.unwrap();

        let result = server_conn.recv().await.expect("recv should not error");
        assert!(result.is_none(), "should return None on client close");
    }

    #[tokio::test]
    async fn test_connection_ids_are_unique() {
        let (mut transport, addr) = bind().await;
        let server_handle = tokio::spawn(async move {
            let a = accept_upgraded(&mut transport).await;
            let b = accept_upgraded(&mut transport).await;
            (a.id(), b.id())
        });

        let _c1 = connect_client(&addr).await;
        let _c2 = connect_client(&addr).await;
        let (a, b) = server_handle.await.unwrap();
        assert_ne!(a, b);
    }
}
