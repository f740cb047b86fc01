use crate::models::search::QueryParams;
use crate::models::telemetry::TelemetryDescriptor;
use std::collections::BTreeMap;

/// 路由路径参数
pub type RouteParams = BTreeMap<String, String>;

/// 当前路由快照
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteSnapshot {
    pub params: RouteParams,
    pub query_params: QueryParams,
    pub data: RouteData,
}

/// 路由静态数据
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteData {
    pub telemetry: Option<TelemetryDescriptor>,
}
