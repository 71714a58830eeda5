use screener_core::score::entity::CompositeResult;
use std::cmp::Ordering;

/// 排名比较：总分降序，其次新闻分降序，再次技术分降序
fn by_score_desc(a: &CompositeResult, b: &CompositeResult) -> Ordering {
    b.total_score
        .cmp(&a.total_score)
        .then_with(|| b.news_score.cmp(&a.news_score))
        .then_with(|| b.technical_score.cmp(&a.technical_score))
}

/// # Summary
/// 批量排名后处理。
///
/// # Logic
/// 1. 剔除 EXCLUDED。
/// 2. 稳定排序，完全同分时保持输入顺序。
/// 3. 保留前 `max_ranked` 条，并重新分配连续优先级 1..N。
pub fn rank(results: Vec<CompositeResult>, max_ranked: usize) -> Vec<CompositeResult> {
    let mut ranked: Vec<CompositeResult> = results.into_iter().filter(|r| !r.is_excluded()).collect();
    ranked.sort_by(by_score_desc);
    ranked.truncate(max_ranked);
    for (index, result) in ranked.iter_mut().enumerate() {
        result.priority = u32::try_from(index + 1).unwrap_or(u32::MAX);
    }
    ranked
}
