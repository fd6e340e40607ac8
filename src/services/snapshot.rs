use crate::errors::Result;
use crate::models::quote::{InstrumentKind, SpotRecord};
use crate::providers::base::SpotProvider;
use crate::util;
use log::{info, warn};
use serde_json::{json, Value};
use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

/// 关注的ETF代码列表
pub const WATCHLIST_ETF: [&str; 14] = [
    "518880", "513130", "512100", "588000", "510300", "510500", "510050",
    "159915", "512880", "159995", "513050", "513100", "512480", "562500",
];

/// 关注的指数代码列表
pub const WATCHLIST_INDEX: [&str; 4] = ["000001", "399001", "399006", "000300"];

/// 一次性行情快照服务，将关注列表的行情写入文本和JSON文件
pub struct SnapshotService {
    provider: Arc<dyn SpotProvider + Send + Sync>,
}

impl SnapshotService {
    pub fn new(provider: Arc<dyn SpotProvider + Send + Sync>) -> Self {
        Self { provider }
    }

    /// 按关注列表顺序收集行情记录
    pub async fn collect(&self) -> Result<Vec<(SpotRecord, InstrumentKind)>> {
        let etf_table = self.provider.fetch_spot(InstrumentKind::Etf).await?;
        let index_table = self.provider.fetch_spot(InstrumentKind::Index).await?;

        let mut entries = Vec::new();

        for code in WATCHLIST_ETF {
            match etf_table.iter().find(|r| r.code == code) {
                Some(record) => entries.push((record.clone(), InstrumentKind::Etf)),
                None => warn!("未找到ETF {} 的行情", code),
            }
        }

        for code in WATCHLIST_INDEX {
            match index_table.iter().find(|r| r.code == code) {
                Some(record) => entries.push((record.clone(), InstrumentKind::Index)),
                None => warn!("未找到指数 {} 的行情", code),
            }
        }

        Ok(entries)
    }

    /// 抓取行情并写入快照文件
    pub async fn dump(&self, text_path: &Path, json_path: &Path) -> Result<()> {
        let update_time = util::now_shanghai();
        info!("=== 更新实时行情数据 {} ===", update_time);

        let entries = self.collect().await?;
        for (record, _) in &entries {
            info!("  {} {}: {}", record.code, record.name, record.price);
        }

        std::fs::write(text_path, render_text(&entries, &update_time))?;
        let json = build_json(&entries, &update_time);
        std::fs::write(json_path, serde_json::to_string_pretty(&json)?)?;

        info!(
            "数据已保存到 {} 和 {}",
            text_path.display(),
            json_path.display()
        );
        Ok(())
    }
}

/// 渲染TypeScript对象字面量格式的快照文本
pub fn render_text(entries: &[(SpotRecord, InstrumentKind)], update_time: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "// 更新时间: {}", update_time);
    for (record, kind) in entries {
        out.push_str(&render_entry(record, *kind));
    }
    out
}

fn render_entry(record: &SpotRecord, kind: InstrumentKind) -> String {
    let suffix = util::market_suffix(&record.code);
    let mut out = String::new();
    let _ = writeln!(out, "  '{}': {{", record.code);
    let _ = writeln!(
        out,
        "    name: '{}', code: '{}{}', price: {}, change: {}, changePercent: {}, type: '{}',",
        record.name, record.code, suffix, record.price, record.change,
        record.change_percent, kind.as_str()
    );
    let _ = writeln!(
        out,
        "    prevClose: {}, open: {}, high: {}, low: {},",
        record.prev_close, record.open, record.high, record.low
    );
    let _ = writeln!(
        out,
        "    volume: '{}', turnover: '{}', amplitude: {}, turnoverRate: {},",
        util::format_volume(record.volume),
        util::format_turnover(record.amount),
        record.amplitude,
        record.turnover_rate
    );
    // 52周高低点暂以当日价格带近似
    let _ = writeln!(
        out,
        "    week52High: {:.2}, week52Low: {:.2}",
        record.high * 1.1,
        record.low * 0.9
    );
    out.push_str("  },\n");
    out
}

/// 构建JSON快照
pub fn build_json(entries: &[(SpotRecord, InstrumentKind)], update_time: &str) -> Value {
    let mut data = serde_json::Map::new();
    for (record, kind) in entries {
        let quote = record.clone().into_quote(*kind, update_time.to_string());
        data.insert(record.code.clone(), serde_json::to_value(quote).unwrap_or(Value::Null));
    }
    json!({
        "updateTime": update_time,
        "data": Value::Object(data),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::quote_service::tests::{record, FixedProvider};

    fn entries() -> Vec<(SpotRecord, InstrumentKind)> {
        vec![
            (record("518880", "黄金ETF", 7.5), InstrumentKind::Etf),
            (record("399001", "深证成指", 10000.0), InstrumentKind::Index),
        ]
    }

    #[test]
    fn text_layout_matches_hand_format() {
        let text = render_text(&entries(), "2024-01-02 15:30:00");

        assert!(text.starts_with("// 更新时间: 2024-01-02 15:30:00\n"));
        assert!(text.contains("  '518880': {\n"));
        assert!(text.contains("name: '黄金ETF', code: '518880.SH', price: 7.5"));
        assert!(text.contains("type: 'etf',"));
        assert!(text.contains("code: '399001.SZ'"));
        assert!(text.contains("volume: '123.46万', turnover: '2.50亿'"));
        // week52High = high * 1.1，保留两位小数
        assert!(text.contains("week52High: 8.36, week52Low: 6.66"));
        assert!(text.ends_with("  },\n"));
    }

    #[test]
    fn json_snapshot_is_keyed_by_code() {
        let json = build_json(&entries(), "2024-01-02 15:30:00");

        assert_eq!(json["updateTime"], "2024-01-02 15:30:00");
        assert_eq!(json["data"]["518880"]["name"], "黄金ETF");
        assert_eq!(json["data"]["518880"]["type"], "etf");
        assert_eq!(json["data"]["399001"]["type"], "index");
        assert_eq!(json["data"]["518880"]["updateTime"], "2024-01-02 15:30:00");
    }

    #[tokio::test]
    async fn collect_keeps_watchlist_order_and_skips_missing() {
        let provider = FixedProvider {
            stocks: vec![],
            etfs: vec![
                record("510300", "沪深300ETF", 3.25),
                record("518880", "黄金ETF", 7.5),
            ],
            indices: vec![record("000001", "上证指数", 3000.0)],
        };
        let service = SnapshotService::new(Arc::new(provider));

        let entries = service.collect().await.unwrap();
        let codes: Vec<&str> = entries.iter().map(|(r, _)| r.code.as_str()).collect();
        // 关注列表中518880在510300之前，未上榜的代码被跳过
        assert_eq!(codes, vec!["518880", "510300", "000001"]);
    }
}
