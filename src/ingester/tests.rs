//! Unit tests for ingester module

#[cfg(test)]
mod tests {
    use super::super::*;

    #[test]
    fn test_decode_envelope() {
        let payload = r#"{
            "messages": [
                {
                    "id": 42,
                    "platform": "discord",
                    "guild_id": "100",
                    "channel_id": 200,
                    "channel_name": "alpha-calls",
                    "message_id": "300",
                    "author_nickname": "trader_joe",
                    "message_content": "$ETH long",
                    "timestamp": 1700000000
                }
            ]
        }"#;

        let messages = decode_messages(payload).unwrap();
        assert_eq!(messages.len(), 1);
        let msg = &messages[0];
        assert_eq!(msg.id, "42");
        assert_eq!(msg.channel_id.as_deref(), Some("200"));
        assert_eq!(msg.guild_id.as_deref(), Some("100"));
        assert_eq!(msg.timestamp, Some(1_700_000_000));
        assert!(msg.signal.is_none());
    }

    #[test]
    fn test_decode_bare_array() {
        let payload = r#"[{"id": "a1", "message_content": "BTC"}, {"id": "a2"}]"#;
        let messages = decode_messages(payload).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].id, "a2");
        assert!(messages[1].message_content.is_none());
    }

    #[test]
    fn test_decode_envelope_without_messages() {
        let messages = decode_messages(r#"{"total": 0}"#).unwrap();
        assert!(messages.is_empty());
    }

    #[test]
    fn test_decode_invalid_json() {
        assert!(decode_messages("<html>").is_err());
    }

    #[test]
    fn test_lenient_timestamp() {
        let payload = r#"[
            {"id": "1", "timestamp": "1700000000000"},
            {"id": "2", "timestamp": "yesterday"},
            {"id": "3", "timestamp": null},
            {"id": "4"},
            {"id": "5", "timestamp": 1700000000.5}
        ]"#;
        let messages = decode_messages(payload).unwrap();
        assert_eq!(messages[0].timestamp, Some(1_700_000_000_000));
        assert_eq!(messages[1].timestamp, None);
        assert_eq!(messages[2].timestamp, None);
        assert_eq!(messages[3].timestamp, None);
        assert_eq!(messages[4].timestamp, Some(1_700_000_000));
    }

    #[test]
    fn test_blank_hint_and_content() {
        let msg = RawMessage {
            id: "1".to_string(),
            signal: Some("   ".to_string()),
            message_content: Some("\n\t".to_string()),
            ..Default::default()
        };
        assert!(msg.hint().is_none());
        assert!(msg.content().is_none());
    }

    #[test]
    fn test_dedup_key_falls_back_to_location() {
        let msg = RawMessage {
            platform: Some("kook".to_string()),
            channel_id: Some("9".to_string()),
            message_id: Some("77".to_string()),
            ..Default::default()
        };
        assert_eq!(msg.dedup_key(), "kook:9:77");

        let with_id = RawMessage {
            id: "abc".to_string(),
            ..msg
        };
        assert_eq!(with_id.dedup_key(), "abc");
    }

    #[tokio::test]
    async fn test_file_source_reads_dump() {
        let path = std::env::temp_dir().join(format!("kol-source-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, r#"{"messages": [{"id": 7, "message_content": "$SOL short"}]}"#)
            .unwrap();

        let source = FileSource::new(&path);
        assert_eq!(source.name(), "file");
        let messages = source.fetch().await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].id, "7");

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_file_source_missing_file() {
        let source = FileSource::new("/nonexistent/kol/messages.json");
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, crate::error::RelayError::Io(_)));
    }
}
