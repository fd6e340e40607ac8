use chrono::Utc;
use chrono_tz::Asia::Shanghai;

/// 格式化成交量，按万/亿缩写
pub fn format_volume(vol: f64) -> String {
    if vol >= 100_000_000.0 {
        format!("{:.2}亿", vol / 100_000_000.0)
    } else if vol >= 10_000.0 {
        format!("{:.2}万", vol / 10_000.0)
    } else {
        format!("{}", vol as i64)
    }
}

/// 格式化成交额，按万/亿缩写
pub fn format_turnover(amount: f64) -> String {
    if amount >= 100_000_000.0 {
        format!("{:.2}亿", amount / 100_000_000.0)
    } else if amount >= 10_000.0 {
        format!("{:.2}万", amount / 10_000.0)
    } else {
        format!("{:.0}", amount)
    }
}

/// 当前北京时间，格式 yyyy-MM-dd HH:mm:ss
pub fn now_shanghai() -> String {
    Utc::now()
        .with_timezone(&Shanghai)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// 根据代码前缀推断交易所后缀
pub fn market_suffix(code: &str) -> &'static str {
    // 深证成指/创业板指在深交所，其余5/6/0开头的代码归上交所
    if code == "399001" || code == "399006" {
        return ".SZ";
    }
    if code.starts_with('5') || code.starts_with('6') || code.starts_with('0') {
        ".SH"
    } else {
        ".SZ"
    }
}
