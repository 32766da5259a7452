//! Tests for notify module

#[cfg(test)]
mod tests {
    use super::super::*;

    fn outbound() -> OutboundSignal {
        OutboundSignal {
            id: "m1".to_string(),
            title: "【trader_joe】BTC 交易信号".to_string(),
            author: "trader_joe".to_string(),
            symbol: "BTC".to_string(),
            direction: "long".to_string(),
            entry_price: "60000".to_string(),
            stop_loss: "58000".to_string(),
            target_price: "65000".to_string(),
            leverage: "10".to_string(),
            position_size: "unknown".to_string(),
            trade_type: "contract".to_string(),
            analysis: String::new(),
            message_time: "2023/11/15 06:13:20".to_string(),
            channel: "alpha-calls".to_string(),
            original_link: "https://discord.com/channels/1/2/3".to_string(),
            message_content: "BTC long".to_string(),
            quality: 95,
            quality_level: "extreme-high".to_string(),
            quality_details: vec!["Symbol identified".to_string()],
        }
    }

    #[test]
    fn test_webhook_sink_creation() {
        let sink = WebhookSink::new("https://example.com/hook");
        assert!(sink.is_enabled());
        assert_eq!(sink.name(), "webhook");

        let disabled = WebhookSink::disabled();
        assert!(!disabled.is_enabled());
    }

    #[test]
    fn test_webhook_body_shape() {
        let signal = outbound();
        let body = serde_json::to_value(WebhookSink::body(&signal)).unwrap();

        assert_eq!(body["msgtype"], "markdown");
        assert_eq!(body["markdown"]["title"], "【trader_joe】BTC 交易信号");
        let text = body["markdown"]["text"].as_str().unwrap();
        assert!(text.contains("BTC"));
        assert!(text.contains("https://discord.com/channels/1/2/3"));
        assert_eq!(body["signal"]["entryPrice"], "60000");
        assert_eq!(body["signal"]["qualityLevel"], "extreme-high");
    }

    #[test]
    fn test_markdown_skips_empty_analysis() {
        let mut signal = outbound();
        assert!(!signal.to_markdown().contains("Analysis"));

        signal.analysis = "Breakout retest".to_string();
        assert!(signal.to_markdown().contains("Breakout retest"));
    }

    #[test]
    fn test_disabled_webhook_accepts() {
        let sink = WebhookSink::disabled();
        let result = tokio_test::block_on(sink.deliver(&outbound()));
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_webhook_fails() {
        let sink = WebhookSink::new("http://127.0.0.1:9/hook");
        assert!(sink.deliver(&outbound()).await.is_err());
    }

    #[tokio::test]
    async fn test_stdout_sink_delivers() {
        let sink = StdoutSink;
        assert_eq!(sink.name(), "stdout");
        assert!(sink.deliver(&outbound()).await.is_ok());
    }
}
