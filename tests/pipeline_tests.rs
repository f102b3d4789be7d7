//! End-to-end tests over the public pipeline

#[cfg(test)]
mod tests {
    use polyassist::chart::{nearest, points_from_market_chart, points_from_records, window};
    use polyassist::matcher::{match_speaker, SpeakerDataset};
    use polyassist::polymarket::{
        decode_market_payload, normalize_batch, normalize_market, NormalizeOptions, RawMarket,
    };
    use polyassist::risk::compute_risk;
    use polyassist::strategy::{analyze, evaluate, MarketFilter, Recommendation, SignalConfig};
    use polyassist::types::{Direction, MatchResult, RiskBucket};
    use polyassist::AssistError;
    use serde_json::{json, Value};

    fn raw(value: Value) -> RawMarket {
        serde_json::from_value(value).unwrap()
    }

    const DATASET: &str = r#"{
        "records": [
            {
                "name": "Donald Trump",
                "keywords": {
                    "tariff": {"base_rate": 0.72, "mentions": 36, "total_events": 50},
                    "crypto": {"base_rate": 0.34}
                }
            },
            {
                "name": "Trump",
                "keywords": {
                    "tariff": {"base_rate": 0.10}
                }
            },
            {
                "name": "Powell",
                "keywords": {
                    "inflation": {
                        "base_rate": 0.95,
                        "mentions": 19,
                        "total_events": 20,
                        "contexts": {
                            "regular": {"rate": 0.94, "mentions": 15, "total": 16},
                            "focused": {"rate": 1.0, "mentions": 4, "total": 4}
                        }
                    }
                }
            }
        ]
    }"#;

    // ============================================================================
    // Normalizer
    // ============================================================================

    #[test]
    fn test_single_record_normalizes() {
        let market = normalize_market(
            &raw(json!({"question": "Will X happen?", "lastTradePrice": 0.63, "volume": 1000})),
            &NormalizeOptions::default(),
        )
        .unwrap();

        assert_eq!(market.name, "Will X happen?");
        assert_eq!(market.probability, 0.63);
        assert_eq!(market.volume, 1000.0);
        assert_eq!(market.change24h, 0.0);
        assert_eq!(market.liquidity, 0.0);
        assert!(market.url.starts_with("https://polymarket.com/?search="));
    }

    #[test]
    fn test_record_without_probability_is_dropped() {
        let payloads = [
            json!({"question": "No price"}),
            json!({"question": "Bad price", "lastTradePrice": "n/a"}),
            json!({"question": "Empty outcomes", "outcomePrices": "[]"}),
        ];
        for payload in payloads {
            assert!(normalize_market(&raw(payload), &NormalizeOptions::default()).is_none());
        }
    }

    #[test]
    fn test_percent_probabilities_are_rescaled() {
        for (input, expected) in [(63.0, 0.63), (150.0, 1.0), (100.0, 1.0), (1.5, 0.015)] {
            let market = normalize_market(
                &raw(json!({"question": "Q", "lastTradePrice": input})),
                &NormalizeOptions::default(),
            )
            .unwrap();
            assert!((market.probability - expected).abs() < 1e-12, "input {input}");
        }
    }

    #[test]
    fn test_feed_payload_to_ranked_markets() {
        let payload = json!({
            "data": [
                {"question": "Low", "lastTradePrice": 0.2, "volume": "15"},
                {"question": "Dropped"},
                {"question": "High", "outcomes": "[\"No\",\"Yes\"]", "outcomePrices": "[\"0.3\",\"0.7\"]", "volume24hr": 900},
                {"question": "Mid", "bestAsk": 0.5, "volume": 300, "slug": "mid-market"}
            ]
        });

        let raws = decode_market_payload(payload).unwrap();
        let markets = normalize_batch(raws, &NormalizeOptions::default()).unwrap();

        let names: Vec<&str> = markets.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["High", "Mid", "Low"]);
        assert_eq!(markets[0].probability, 0.7);
        assert_eq!(markets[1].url, "https://polymarket.com/event/mid-market");
        assert!(markets.windows(2).all(|w| w[0].volume >= w[1].volume));
    }

    #[test]
    fn test_unusable_batch_fails() {
        let raws = decode_market_payload(json!([{"title": "nothing"}])).unwrap();
        assert_eq!(
            normalize_batch(raws, &NormalizeOptions::default()).unwrap_err(),
            AssistError::NoUsableRecords
        );
        assert!(matches!(
            decode_market_payload(json!({"error": "down"})),
            Err(AssistError::FeedUnavailable(_))
        ));
    }

    // ============================================================================
    // Matcher + analysis
    // ============================================================================

    #[test]
    fn test_earlier_record_wins_over_substring_name() {
        let dataset = SpeakerDataset::from_json(DATASET).unwrap();
        let result = match_speaker(
            "Will Donald Trump say tariff?",
            "",
            dataset.records(),
        );
        match result {
            MatchResult::SpeakerAndKeyword { speaker, stat, .. } => {
                assert_eq!(speaker, "Donald Trump");
                assert_eq!(stat.base_rate, 0.72);
            }
            other => panic!("unexpected match {other:?}"),
        }
    }

    #[test]
    fn test_speaker_without_keyword() {
        let dataset = SpeakerDataset::from_json(DATASET).unwrap();
        assert_eq!(
            dataset.find_match("Powell press conference", "Fed"),
            MatchResult::SpeakerOnly {
                speaker: "Powell".to_string()
            }
        );
        assert_eq!(dataset.find_match("Lagarde speech", ""), MatchResult::NoMatch);
    }

    #[test]
    fn test_match_feeds_analysis() {
        let dataset = SpeakerDataset::from_json(DATASET).unwrap();
        let matched = dataset.find_match("", "Will Powell say inflation?");
        let analysis = analyze(&matched, Some(0.60), &SignalConfig::default()).unwrap();

        assert_eq!(analysis.keyword, "inflation");
        assert_eq!(analysis.recommendation, Recommendation::Underpriced);
        assert_eq!(analysis.signal.direction, Direction::Yes);
        assert_eq!(analysis.gap_display(), "+35.0%");
        assert_eq!(analysis.stat.contexts.unwrap().focused.total, 4);
    }

    #[test]
    fn test_filter_selects_speaker_markets() {
        let dataset = SpeakerDataset::from_json(DATASET).unwrap();
        let raws = decode_market_payload(json!([
            {"question": "Will Powell cut?", "lastTradePrice": 0.4, "volume": 10},
            {"question": "ETH above 4k?", "lastTradePrice": 0.2, "volume": 20, "liquidity": 9000}
        ]))
        .unwrap();
        let markets = normalize_batch(raws, &NormalizeOptions::default()).unwrap();

        let speakers_only = MarketFilter {
            speaker_markets: true,
            ..Default::default()
        };
        let picked = speakers_only.apply(&markets, &dataset);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].name, "Will Powell cut?");

        assert_eq!(MarketFilter::default().apply(&markets, &dataset).len(), 2);
    }

    // ============================================================================
    // Signals
    // ============================================================================

    #[test]
    fn test_underpriced_signal() {
        let signal = evaluate(Some(0.63), Some(0.40), 0.15);
        assert_eq!(signal.direction, Direction::Yes);
        assert!((signal.edge - 0.23).abs() < 1e-9);
        assert_eq!(signal.risk, RiskBucket::Low);
        assert_eq!(signal.risk.to_string(), "LOW");
    }

    #[test]
    fn test_direction_and_confidence_bounds() {
        let steps = [0.0, 0.05, 0.1, 0.3, 0.5, 0.7, 0.95, 1.0];
        for base in steps {
            for current in steps {
                for min_gap in [0.0, 0.15, 0.5] {
                    let signal = evaluate(Some(base), Some(current), min_gap);
                    let gap = base - current;
                    let expected = if gap > min_gap {
                        Direction::Yes
                    } else if gap < -min_gap {
                        Direction::No
                    } else {
                        Direction::Hold
                    };
                    assert_eq!(signal.direction, expected);
                    assert!((0.4..=0.92).contains(&signal.confidence));
                }
            }
        }
    }

    // ============================================================================
    // Risk
    // ============================================================================

    #[test]
    fn test_kelly_sizing() {
        let calc = compute_risk(0.60, 0.50, 100.0).unwrap();
        assert!((calc.win_amount - 100.0).abs() < 1e-9);
        assert!((calc.expected_value - 20.0).abs() < 1e-9);
        assert!((calc.kelly_percent - 20.0).abs() < 1e-9);
        assert_eq!(calc.risk, RiskBucket::Medium);
    }

    #[test]
    fn test_risk_bucket_on_computed_edges() {
        assert_eq!(compute_risk(0.30, 0.10, 10.0).unwrap().risk, RiskBucket::Low);
        assert_eq!(compute_risk(0.50, 0.40, 10.0).unwrap().risk, RiskBucket::Medium);
        assert_eq!(compute_risk(0.50, 0.41, 10.0).unwrap().risk, RiskBucket::High);
        assert_eq!(evaluate(Some(0.6), Some(0.5), 0.05).risk, RiskBucket::Medium);
        assert_eq!(evaluate(Some(0.1), Some(0.3), 0.05).risk, RiskBucket::Low);
    }

    #[test]
    fn test_zero_price_is_rejected() {
        assert!(matches!(
            compute_risk(0.5, 0.0, 10.0),
            Err(AssistError::Domain(_))
        ));
    }

    #[test]
    fn test_kelly_never_negative() {
        let grid = [0.05, 0.2, 0.35, 0.5, 0.65, 0.8, 0.95];
        for probability in grid {
            for price in grid {
                let calc = compute_risk(probability, price, 50.0).unwrap();
                assert!(calc.kelly_percent >= 0.0);
                let ev = probability * calc.win_amount - (1.0 - probability) * 50.0;
                assert_eq!(calc.expected_value, ev);
            }
        }
    }

    // ============================================================================
    // Chart
    // ============================================================================

    #[test]
    fn test_live_history_window() {
        let payload = json!({
            "prices": [
                [1709251200000i64, 3300.0],
                [1709337600000i64, 3450.0],
                [1709424000000i64, 3500.0]
            ]
        });
        let series = points_from_market_chart(&payload).unwrap();
        let win = window(&series, 7).unwrap();

        assert_eq!(win.points.len(), 3);
        assert_eq!(win.points[0].date, "Mar 01");
        assert_eq!(win.min, 3300.0);
        assert_eq!(win.max, 3500.0);
        assert_eq!(nearest(&win, 1.0).unwrap().price, 3500.0);
        assert_eq!(win.scale(3400.0), 0.5);
    }

    #[test]
    fn test_bundled_history_window() {
        let doc = json!({
            "records": [
                {"date": "Mar 03", "price": 10.0},
                {"date": "Mar 02", "price": 10.0},
                {"date": "Mar 01", "price": 10.0}
            ]
        });
        let series = points_from_records(&doc);
        let win = window(&series, 2).unwrap();

        assert_eq!(win.points.len(), 2);
        assert_eq!(win.points[0].date, "Mar 02");
        assert_eq!((win.min, win.max), (10.0, 11.0));
    }
}
