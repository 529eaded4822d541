#![allow(dead_code)]

async fn test_relay_snapshot(server: actix::Addr<crate::modules::websocket::server::RelayServer>) {
    use crate::modules::websocket::events::GetStats;

    let stats = server.send(GetStats).await.unwrap();

    println!("{:#?}", stats);

    assert_eq!(stats.total_rooms, stats.rooms.len());
}
