//! 分页计算

use serde::{Deserialize, Serialize};

/// 页码条最多显示的页数
pub const PAGE_STRIP: u32 = 5;

/// 分页状态
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pager {
    pub total_items: u64,
    pub current_page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub start_page: u32,
    pub end_page: u32,
    /// 当前页第一条的下标（从 0 开始）
    pub start_index: u64,
    /// 当前页最后一条的下标
    pub end_index: u64,
    pub pages: Vec<u32>,
}

/// 根据总数、当前页和每页数量计算分页状态
///
/// 页码条固定宽度 `PAGE_STRIP`，尽量让当前页居中
pub fn get_pager(total_items: u64, current_page: u32, page_size: u32) -> Pager {
    let page_size = page_size.max(1);
    let total_pages = total_items.div_ceil(u64::from(page_size)) as u32;
    let current_page = current_page.max(1);

    let half = PAGE_STRIP / 2;
    let (start_page, end_page) = if total_pages <= PAGE_STRIP {
        (1, total_pages.max(1))
    } else if current_page <= half + 1 {
        (1, PAGE_STRIP)
    } else if current_page + half >= total_pages {
        (total_pages - PAGE_STRIP + 1, total_pages)
    } else {
        (current_page - half, current_page + half)
    };

    let start_index = u64::from(current_page - 1) * u64::from(page_size);
    let end_index = (start_index + u64::from(page_size) - 1).min(total_items.saturating_sub(1));

    Pager {
        total_items,
        current_page,
        page_size,
        total_pages,
        start_page,
        end_page,
        start_index,
        end_index,
        pages: (start_page..=end_page).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(get_pager(41, 1, 20).total_pages, 3);
        assert_eq!(get_pager(40, 1, 20).total_pages, 2);
        assert_eq!(get_pager(1, 1, 20).total_pages, 1);
    }

    #[test]
    fn test_strip_positions() {
        // 页数不足一条
        assert_eq!(get_pager(60, 2, 20).pages, vec![1, 2, 3]);
        // 靠前
        assert_eq!(get_pager(200, 2, 20).pages, vec![1, 2, 3, 4, 5]);
        // 居中
        assert_eq!(get_pager(200, 6, 20).pages, vec![4, 5, 6, 7, 8]);
        // 靠后
        assert_eq!(get_pager(200, 9, 20).pages, vec![6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_index_range() {
        let pager = get_pager(45, 3, 20);
        assert_eq!(pager.start_index, 40);
        assert_eq!(pager.end_index, 44);
    }
}
