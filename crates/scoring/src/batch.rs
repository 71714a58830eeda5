use crate::calculator::ScoreCalculator;
use crate::ranking::rank;
use chrono::NaiveDate;
use futures::StreamExt;
use rayon::prelude::*;
use screener_core::market::entity::Stock;
use screener_core::market::port::MinuteDataProvider;
use screener_core::news::entity::NewsItem;
use screener_core::score::entity::CompositeResult;
use screener_market::minute::MinuteFetcher;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

/// 按股票代码分组的新闻
pub type NewsByCode = HashMap<String, Vec<NewsItem>>;

/// # Summary
/// 批量分析的协作式取消标记。
///
/// # Invariants
/// - 只在单只股票的边界检查：已开始的股票会完成，之后的股票被跳过。
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

fn news_for<'a>(news_by_code: &'a NewsByCode, code: &str) -> &'a [NewsItem] {
    news_by_code.get(code).map(Vec::as_slice).unwrap_or(&[])
}

impl ScoreCalculator {
    /// # Summary
    /// 全市场批量分析（仅日线），返回排名后的前 `max_ranked` 条。
    pub fn analyze_universe(
        &self,
        stocks: &[Stock],
        news_by_code: &NewsByCode,
        analysis_date: NaiveDate,
    ) -> Vec<CompositeResult> {
        self.analyze_universe_with_cancel(stocks, news_by_code, analysis_date, &CancelFlag::default())
    }

    /// # Summary
    /// 可取消的并行批量分析。
    ///
    /// # Logic
    /// 1. rayon 并行映射每只股票；开始分析前检查取消标记。
    /// 2. 收集结果保持输入顺序，再做排名后处理。
    pub fn analyze_universe_with_cancel(
        &self,
        stocks: &[Stock],
        news_by_code: &NewsByCode,
        analysis_date: NaiveDate,
        cancel: &CancelFlag,
    ) -> Vec<CompositeResult> {
        let results: Vec<CompositeResult> = stocks
            .par_iter()
            .filter_map(|stock| {
                if cancel.is_cancelled() {
                    return None;
                }
                Some(self.analyze_with_minutes(stock, news_for(news_by_code, &stock.code), analysis_date, None))
            })
            .collect();
        self.finish(results, stocks.len())
    }

    /// # Summary
    /// 带分钟线的异步批量分析。
    ///
    /// # Logic
    /// 1. 以 `batch.concurrency` 为上限并发抓取分钟线，每次抓取受超时约束。
    /// 2. 抓取失败的股票降级为仅日线分析。
    /// 3. 按输入顺序整理后排名，保证同分时结果确定。
    pub async fn analyze_universe_with_minutes(
        &self,
        stocks: &[Stock],
        news_by_code: &NewsByCode,
        analysis_date: NaiveDate,
        provider: Arc<dyn MinuteDataProvider>,
        cancel: &CancelFlag,
    ) -> Vec<CompositeResult> {
        let fetcher = MinuteFetcher::new(provider, &self.batch);
        let concurrency = self.batch.concurrency.max(1);

        let mut indexed: Vec<(usize, CompositeResult)> = futures::stream::iter(stocks.iter().enumerate())
            .map(|(index, stock)| {
                let fetcher = &fetcher;
                async move {
                    if cancel.is_cancelled() {
                        return None;
                    }
                    let minutes = fetcher.fetch(&stock.code).await;
                    let news = news_for(news_by_code, &stock.code);
                    Some((index, self.analyze_with_minutes(stock, news, analysis_date, minutes.as_deref())))
                }
            })
            .buffer_unordered(concurrency)
            .filter_map(futures::future::ready)
            .collect()
            .await;
        indexed.sort_by_key(|(index, _)| *index);

        let results = indexed.into_iter().map(|(_, result)| result).collect();
        self.finish(results, stocks.len())
    }

    fn finish(&self, results: Vec<CompositeResult>, requested: usize) -> Vec<CompositeResult> {
        let analyzed = results.len();
        let excluded = results.iter().filter(|r| r.is_excluded()).count();
        let ranked = rank(results, self.engine.max_ranked);
        info!(
            "Batch analysis done: {} requested, {} analyzed, {} skipped, {} excluded, {} ranked",
            requested,
            analyzed,
            requested.saturating_sub(analyzed),
            excluded,
            ranked.len()
        );
        ranked
    }
}
