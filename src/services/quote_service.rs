use crate::config::Config;
use crate::errors::{RelayError, Result};
use crate::models::quote::{InstrumentKind, Quote, QuoteSummary, SpotRecord};
use crate::providers::base::SpotProvider;
use crate::util;
use log::{info, warn};
use std::collections::HashMap;
use std::sync::Arc;

/// 行情服务，负责分类查询与批量查询
pub struct QuoteService {
    config: Config,
    provider: Arc<dyn SpotProvider + Send + Sync>,
}

impl QuoteService {
    /// 创建新的行情服务实例
    pub fn new(config: Config, provider: Arc<dyn SpotProvider + Send + Sync>) -> Self {
        Self { config, provider }
    }

    /// 获取单个股票/ETF/指数实时行情
    pub async fn get_quote(&self, symbol: &str) -> Result<Quote> {
        let kind = InstrumentKind::classify(symbol);
        info!("Fetching quote for {} ({})", symbol, kind.as_str());

        let records = self.provider.fetch_spot(kind).await?;
        let record = records
            .into_iter()
            .find(|r| r.code == symbol)
            .ok_or_else(|| RelayError::SymbolNotFound(symbol.to_string()))?;

        Ok(record.into_quote(kind, util::now_shanghai()))
    }

    /// 批量获取行情数据，未找到的代码会被跳过
    pub async fn get_quotes(&self, symbols: &[String]) -> Result<HashMap<String, Quote>> {
        let mut tables: HashMap<InstrumentKind, Vec<SpotRecord>> = HashMap::new();
        let mut results = HashMap::new();

        for symbol in symbols {
            let kind = InstrumentKind::classify(symbol);

            // 每种证券类型的行情快照在一次批量请求内只拉取一次
            if !tables.contains_key(&kind) {
                match self.provider.fetch_spot(kind).await {
                    Ok(records) => {
                        tables.insert(kind, records);
                    }
                    Err(e) => {
                        warn!("获取{}行情失败: {}", kind.as_str(), e);
                        tables.insert(kind, Vec::new());
                    }
                }
            }

            let record = tables
                .get(&kind)
                .and_then(|records| records.iter().find(|r| r.code == *symbol));

            match record {
                Some(record) => {
                    let quote = record.clone().into_quote(kind, util::now_shanghai());
                    results.insert(symbol.clone(), quote);
                }
                None => {
                    warn!("未找到 {} 的行情", symbol);
                }
            }
        }

        info!("Batch lookup resolved {} of {} symbols", results.len(), symbols.len());
        Ok(results)
    }

    /// 获取ETF行情列表，最多返回配置的条数
    pub async fn list_etf(&self) -> Result<Vec<QuoteSummary>> {
        let records = self.provider.fetch_spot(InstrumentKind::Etf).await?;
        Ok(records
            .iter()
            .take(self.config.etf_list_limit)
            .map(SpotRecord::summary)
            .collect())
    }

    /// 获取所有指数行情列表
    pub async fn list_index(&self) -> Result<Vec<QuoteSummary>> {
        let records = self.provider.fetch_spot(InstrumentKind::Index).await?;
        Ok(records.iter().map(SpotRecord::summary).collect())
    }
}
