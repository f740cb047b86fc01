//! 分面数据处理

use crate::models::{DisplayFacets, Facet, FilterFacet, RangeOption};

/// 服务端分面列表 → 按名称索引的展示数据
pub fn process_filter_data(facets: Option<&[Facet]>) -> DisplayFacets {
    facets
        .unwrap_or_default()
        .iter()
        .map(|facet| (facet.name.clone(), facet.values.clone()))
        .collect()
}

/// 提取分面 code 列表，作为下一次搜索请求的 facets
pub fn facet_codes(facets: &[FilterFacet]) -> Vec<String> {
    facets.iter().map(|f| f.code.clone()).collect()
}

/// 按 `index` 升序排列取值，没有 index 的排在最后
pub fn sort_range_by_index(range: &mut [RangeOption]) {
    range.sort_by_key(|option| (option.index.is_none(), option.index));
}
