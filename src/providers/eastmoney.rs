use crate::config::Config;
use crate::errors::{RelayError, Result};
use crate::models::quote::{InstrumentKind, SpotRecord};
use crate::providers::base::SpotProvider;
use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde_json::Value;
use std::sync::Mutex;
use std::time::{Duration, Instant};

const SPOT_URL: &str = "https://push2.eastmoney.com/api/qt/clist/get";

// 东方财富行情接口的通用token
const UT_TOKEN: &str = "fa5fd1943c7b386f172d6893dbfba10b";

/// 各证券类型对应的市场过滤参数（与AKShare保持一致）
fn market_filter(kind: InstrumentKind) -> &'static str {
    match kind {
        InstrumentKind::Stock => "m:0 t:6,m:0 t:80,m:1 t:2,m:1 t:23,m:0 t:81 s:2048",
        InstrumentKind::Etf => "b:MK0021,b:MK0022,b:MK0023,b:MK0024,b:MK0827",
        InstrumentKind::Index => "m:1 s:2,m:0 t:5",
    }
}

/// 东方财富实时行情数据提供者
pub struct EastmoneyProvider {
    client: Client,
    request_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl EastmoneyProvider {
    /// 创建新的东方财富数据提供者
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(RelayError::RequestError)?;

        Ok(Self {
            client,
            request_interval: Duration::from_millis(config.request_interval_ms),
            last_request: Mutex::new(None),
        })
    }

    /// 等待请求频率限制
    async fn wait_for_rate_limit(&self) {
        let now = Instant::now();
        let should_wait = {
            let mut last = self.last_request.lock().unwrap();
            let should_wait = if let Some(instant) = *last {
                let elapsed = instant.elapsed();
                if elapsed < self.request_interval {
                    Some(self.request_interval - elapsed)
                } else {
                    None
                }
            } else {
                None
            };
            *last = Some(now);
            should_wait
        };

        if let Some(wait_time) = should_wait {
            debug!("等待 {:?} 以遵守频率限制", wait_time);
            tokio::time::sleep(wait_time).await;
        }
    }
}

#[async_trait]
impl SpotProvider for EastmoneyProvider {
    fn provider_code(&self) -> &'static str {
        "eastmoney"
    }

    async fn fetch_spot(&self, kind: InstrumentKind) -> Result<Vec<SpotRecord>> {
        info!("获取东方财富{}实时行情", kind.as_str());

        // 限制请求频率
        self.wait_for_rate_limit().await;

        let response = self
            .client
            .get(SPOT_URL)
            .query(&[
                ("pn", "1"),
                ("pz", "10000"),
                ("po", "1"),
                ("np", "1"),
                ("fltt", "2"),
                ("invt", "2"),
                ("fid", "f3"),
                ("fs", market_filter(kind)),
                ("fields", "f2,f3,f4,f5,f6,f7,f8,f12,f14,f15,f16,f17,f18"),
                ("ut", UT_TOKEN),
            ])
            .send()
            .await
            .map_err(RelayError::RequestError)?;

        let json: Value = response.json().await?;

        if json.get("rc").and_then(|v| v.as_i64()).unwrap_or(0) != 0 {
            return Err(RelayError::ProviderError(format!(
                "eastmoney returned rc={} for {}",
                json["rc"], kind.as_str()
            )));
        }

        let records = parse_spot_payload(&json);
        info!("成功获取 {} 条{}行情", records.len(), kind.as_str());
        Ok(records)
    }
}

/// 解析clist接口返回的data.diff数组
pub fn parse_spot_payload(json: &Value) -> Vec<SpotRecord> {
    let mut records = Vec::new();

    let Some(diff) = json
        .get("data")
        .and_then(|d| d.get("diff"))
        .and_then(|d| d.as_array())
    else {
        return records;
    };

    for row in diff {
        let code = match row.get("f12").and_then(|v| v.as_str()) {
            Some(c) => c.to_string(),
            None => continue,
        };
        let name = row
            .get("f14")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        records.push(SpotRecord {
            code,
            name,
            price: field_f64(row, "f2"),
            change_percent: field_f64(row, "f3"),
            change: field_f64(row, "f4"),
            volume: field_f64(row, "f5"),
            amount: field_f64(row, "f6"),
            amplitude: field_f64(row, "f7"),
            turnover_rate: field_f64(row, "f8"),
            high: field_f64(row, "f15"),
            low: field_f64(row, "f16"),
            open: field_f64(row, "f17"),
            prev_close: field_f64(row, "f18"),
        });
    }

    records
}

/// 读取数值字段，停牌时接口返回"-"，按0处理
fn field_f64(row: &Value, key: &str) -> f64 {
    match row.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or_default(),
        Some(Value::String(s)) => s.parse::<f64>().unwrap_or_default(),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_payload_maps_fields() {
        let payload = json!({
            "rc": 0,
            "data": {
                "total": 2,
                "diff": [
                    {
                        "f2": 3.25, "f3": 1.56, "f4": 0.05, "f5": 1234567.0,
                        "f6": 401234567.0, "f7": 2.19, "f8": 0.35,
                        "f12": "510300", "f14": "沪深300ETF",
                        "f15": 3.28, "f16": 3.21, "f17": 3.22, "f18": 3.20
                    },
                    {
                        "f2": 1700.0, "f3": 0.74, "f4": 12.5, "f5": 25000.0,
                        "f6": 4250000000.0f64, "f7": 1.48, "f8": 0.2,
                        "f12": "600519", "f14": "贵州茅台",
                        "f15": 1710.0, "f16": 1685.0, "f17": 1690.0, "f18": 1687.5
                    }
                ]
            }
        });

        let records = parse_spot_payload(&payload);
        assert_eq!(records.len(), 2);

        let etf = &records[0];
        assert_eq!(etf.code, "510300");
        assert_eq!(etf.name, "沪深300ETF");
        assert_eq!(etf.price, 3.25);
        assert_eq!(etf.change_percent, 1.56);
        assert_eq!(etf.change, 0.05);
        assert_eq!(etf.high, 3.28);
        assert_eq!(etf.low, 3.21);
        assert_eq!(etf.open, 3.22);
        assert_eq!(etf.prev_close, 3.20);
        assert_eq!(etf.volume, 1234567.0);
        assert_eq!(etf.amount, 401234567.0);
    }

    #[test]
    fn parse_payload_treats_dash_as_zero() {
        // 停牌的证券价格字段返回"-"
        let payload = json!({
            "rc": 0,
            "data": {
                "diff": [
                    {
                        "f2": "-", "f3": "-", "f4": "-", "f5": "-",
                        "f6": "-", "f7": "-", "f8": "-",
                        "f12": "600000", "f14": "浦发银行",
                        "f15": "-", "f16": "-", "f17": "-", "f18": 7.0
                    }
                ]
            }
        });

        let records = parse_spot_payload(&payload);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].price, 0.0);
        assert_eq!(records[0].volume, 0.0);
        assert_eq!(records[0].prev_close, 7.0);
    }

    #[test]
    fn parse_payload_without_data_is_empty() {
        let payload = json!({"rc": 0, "data": null});
        assert!(parse_spot_payload(&payload).is_empty());
    }

    #[test]
    fn parse_payload_skips_rows_without_code() {
        let payload = json!({
            "rc": 0,
            "data": {"diff": [{"f14": "无代码"}, {"f12": "510050", "f14": "上证50ETF"}]}
        });
        let records = parse_spot_payload(&payload);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].code, "510050");
    }

    #[test]
    fn market_filter_covers_all_kinds() {
        assert!(market_filter(InstrumentKind::Stock).contains("t:6"));
        assert!(market_filter(InstrumentKind::Etf).contains("MK0021"));
        assert!(market_filter(InstrumentKind::Index).contains("s:2"));
    }
}
