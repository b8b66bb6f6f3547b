//! 订单查询类型
//!
//! 统一的过滤 / 分页查询接口，engine 与后端共用同一份契约。

use serde::{Deserialize, Serialize};

use crate::models::{ConsumptionType, OrderStatus};

/// 默认每页数量
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// 排序方向
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortDirection {
    Asc,
    /// 新订单在前
    #[default]
    Desc,
}

/// 订单过滤条件 (None = ALL)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct OrderFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumption_type: Option<ConsumptionType>,
    /// 按创建时间排序
    #[serde(default)]
    pub sort: SortDirection,
    /// ISO-8601 起始时间 (含)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// ISO-8601 结束时间 (含)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// 客户名子串匹配
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid: Option<bool>,
}

/// 分页状态
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pagination {
    /// 页码 (从 1 开始)
    pub page: u32,
    /// 每页数量
    pub limit: u32,
    /// 总记录数 (仅在全量 fetch 后权威)
    pub total: u64,
    /// 总页数 (仅在全量 fetch 后权威)
    pub total_pages: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
            total: 0,
            total_pages: 0,
        }
    }
}

/// 订单列表查询请求 — fetch contract 的请求侧
///
/// 序列化为 query string (None 字段省略)。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderQuery {
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumption_type: Option<ConsumptionType>,
    pub sort: SortDirection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid: Option<bool>,
}

impl OrderQuery {
    /// 由当前过滤条件和分页状态构建请求
    pub fn from_state(filters: &OrderFilters, pagination: &Pagination) -> Self {
        Self {
            page: pagination.page,
            limit: pagination.limit,
            status: filters.status,
            consumption_type: filters.consumption_type,
            sort: filters.sort,
            start_date: filters.start_date.clone(),
            end_date: filters.end_date.clone(),
            customer_name: filters.customer_name.clone(),
            paid: filters.paid,
        }
    }
}

/// 分页响应 — fetch contract 的响应侧
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    /// 数据列表
    pub data: Vec<T>,
    /// 当前页码
    pub page: u32,
    /// 每页数量
    pub limit: u32,
    /// 总记录数
    pub total: u64,
    /// 总页数
    pub total_pages: u32,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total: u64, page: u32, limit: u32) -> Self {
        let total_pages = if limit > 0 {
            ((total as f64) / (limit as f64)).ceil() as u32
        } else {
            1
        };

        Self {
            data,
            page,
            limit,
            total,
            total_pages,
        }
    }
}
