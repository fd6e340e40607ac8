use serde::Serialize;

use crate::util;

/// 上证/深证主要指数代码，按代码精确匹配
const INDEX_CODES: [&str; 6] = ["000001", "399001", "399006", "000300", "000016", "000905"];

/// ETF代码通常以51/15/58/56开头
const ETF_PREFIXES: [&str; 4] = ["51", "15", "58", "56"];

/// 证券类型：股票、ETF或指数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstrumentKind {
    Stock,
    Etf,
    Index,
}

impl InstrumentKind {
    /// 根据代码前缀判断证券类型
    pub fn classify(code: &str) -> Self {
        if INDEX_CODES.contains(&code) {
            InstrumentKind::Index
        } else if ETF_PREFIXES.iter().any(|p| code.starts_with(p)) {
            InstrumentKind::Etf
        } else {
            InstrumentKind::Stock
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InstrumentKind::Stock => "stock",
            InstrumentKind::Etf => "etf",
            InstrumentKind::Index => "index",
        }
    }
}

/// 行情快照中的一行原始数据，金额与成交量保持数值形式
#[derive(Debug, Clone)]
pub struct SpotRecord {
    pub code: String,
    pub name: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub prev_close: f64,
    pub volume: f64,
    pub amount: f64,
    pub amplitude: f64,
    pub turnover_rate: f64,
}

impl SpotRecord {
    /// 转换为对外发布的行情记录
    pub fn into_quote(self, kind: InstrumentKind, update_time: String) -> Quote {
        Quote {
            code: self.code,
            name: self.name,
            price: self.price,
            change: self.change,
            change_percent: self.change_percent,
            open: self.open,
            high: self.high,
            low: self.low,
            prev_close: self.prev_close,
            volume: util::format_volume(self.volume),
            turnover: util::format_turnover(self.amount),
            amplitude: self.amplitude,
            turnover_rate: self.turnover_rate,
            update_time,
            kind,
        }
    }

    pub fn summary(&self) -> QuoteSummary {
        QuoteSummary {
            code: self.code.clone(),
            name: self.name.clone(),
            price: self.price,
            change: self.change,
            change_percent: self.change_percent,
        }
    }
}

/// 对外发布的行情记录，字段与前端约定保持一致
///
/// volume/turnover统一输出万/亿缩写字符串；amplitude/turnoverRate
/// 对股票、ETF和指数均会返回，上游无数据时为0
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub code: String,
    pub name: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub prev_close: f64,
    pub volume: String,
    pub turnover: String,
    pub amplitude: f64,
    pub turnover_rate: f64,
    pub update_time: String,
    #[serde(rename = "type")]
    pub kind: InstrumentKind,
}

/// 行情列表接口使用的简化记录
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummary {
    pub code: String,
    pub name: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_known_index_codes() {
        for code in ["000001", "399001", "399006", "000300", "000016", "000905"] {
            assert_eq!(InstrumentKind::classify(code), InstrumentKind::Index);
        }
    }

    #[test]
    fn classify_etf_prefixes() {
        assert_eq!(InstrumentKind::classify("510300"), InstrumentKind::Etf);
        assert_eq!(InstrumentKind::classify("159915"), InstrumentKind::Etf);
        assert_eq!(InstrumentKind::classify("588000"), InstrumentKind::Etf);
        assert_eq!(InstrumentKind::classify("562500"), InstrumentKind::Etf);
    }

    #[test]
    fn classify_defaults_to_stock() {
        assert_eq!(InstrumentKind::classify("600519"), InstrumentKind::Stock);
        assert_eq!(InstrumentKind::classify("000002"), InstrumentKind::Stock);
        assert_eq!(InstrumentKind::classify("300750"), InstrumentKind::Stock);
    }

    #[test]
    fn quote_serializes_with_frontend_field_names() {
        let record = SpotRecord {
            code: "600519".to_string(),
            name: "贵州茅台".to_string(),
            price: 1700.0,
            change: 12.5,
            change_percent: 0.74,
            open: 1690.0,
            high: 1710.0,
            low: 1685.0,
            prev_close: 1687.5,
            volume: 25_000_000.0,
            amount: 4_250_000_000.0,
            amplitude: 1.48,
            turnover_rate: 0.2,
        };
        let quote = record.into_quote(InstrumentKind::Stock, "2024-01-02 10:00:00".to_string());
        let json = serde_json::to_value(&quote).unwrap();

        assert_eq!(json["changePercent"], 0.74);
        assert_eq!(json["prevClose"], 1687.5);
        assert_eq!(json["turnoverRate"], 0.2);
        assert_eq!(json["type"], "stock");
        assert_eq!(json["volume"], "2500.00万");
        assert_eq!(json["turnover"], "42.50亿");
        assert_eq!(json["updateTime"], "2024-01-02 10:00:00");
    }
}
