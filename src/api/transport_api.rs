// ==========================================
// 农产品供应链追溯系统 - 运输路线 API
// ==========================================
// 职责: 单段运输的路线详情、按实时位置估算到达时间
// 说明: 时长基于球面距离与名义车速,是估算值
// ==========================================

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::api::error::{ApiError, ApiResult};
use crate::config::trace_config::RiskRouteConfig;
use crate::domain::transport::{LegEndpoint, RouteEstimate, TransportLeg};
use crate::domain::types::{GeoPoint, RiskFlag};
use crate::engine::RiskRouteEvaluator;
use crate::repository::trace_reader::TraceRecordReader;

// ==========================================
// TransportApi - 运输路线 API
// ==========================================
pub struct TransportApi {
    reader: Arc<dyn TraceRecordReader>,
    evaluator: RiskRouteEvaluator,
}

impl TransportApi {
    /// 创建新的 TransportApi 实例
    pub fn new(reader: Arc<dyn TraceRecordReader>, config: RiskRouteConfig) -> Self {
        Self {
            reader,
            evaluator: RiskRouteEvaluator::new(config),
        }
    }

    /// 查询运输段及其起止点路线估算
    ///
    /// # 返回
    /// - Ok(RouteDetailsView): route 在起止点缺坐标时为 None
    /// - Err(ApiError::NotFound): 运输单号不存在
    pub async fn get_route_details(&self, transport_code: &str) -> ApiResult<RouteDetailsView> {
        let leg = self.find_leg(transport_code).await?;
        let route = self.evaluator.estimate_leg_route(&leg);
        let cold_chain = self.evaluator.evaluate_leg(&leg);

        Ok(RouteDetailsView {
            route,
            risk_flag: cold_chain.risk_flag,
            leg,
        })
    }

    /// 按当前位置估算到达目的地的时间
    ///
    /// # 参数
    /// - transport_code: 运输单号
    /// - longitude / latitude: 当前位置
    ///
    /// # 返回
    /// - Ok(Some(DestinationEta)): 估算结果
    /// - Ok(None): 目的地缺坐标
    /// - Err(ApiError::InvalidInput): 坐标越界或非有限值
    /// - Err(ApiError::InternalError): 名义车速过低,到达时间溢出
    pub async fn estimate_time_to_destination(
        &self,
        transport_code: &str,
        longitude: f64,
        latitude: f64,
    ) -> ApiResult<Option<DestinationEta>> {
        self.estimate_time_to_destination_at(transport_code, longitude, latitude, Utc::now())
            .await
    }

    pub async fn estimate_time_to_destination_at(
        &self,
        transport_code: &str,
        longitude: f64,
        latitude: f64,
        now: DateTime<Utc>,
    ) -> ApiResult<Option<DestinationEta>> {
        let current = GeoPoint::new(longitude, latitude);
        if !current.is_valid() {
            return Err(ApiError::InvalidInput(format!(
                "坐标非法: longitude={}, latitude={}",
                longitude, latitude
            )));
        }

        let leg = self.find_leg(transport_code).await?;
        let route = match self
            .evaluator
            .estimate_route(Some(current), leg.destination.coordinates)
        {
            Some(route) => route,
            None => {
                debug!(transport_code, "目的地缺坐标,无法估算到达时间");
                return Ok(None);
            }
        };

        let estimated_arrival = i64::try_from(route.duration_seconds)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .and_then(|travel| now.checked_add_signed(travel))
            .ok_or_else(|| {
                ApiError::InternalError(format!(
                    "到达时间超出可表示范围: duration_seconds={}",
                    route.duration_seconds
                ))
            })?;
        info!(
            transport_code,
            distance_m = route.distance_meters,
            duration_s = route.duration_seconds,
            "到达时间估算完成"
        );

        Ok(Some(DestinationEta {
            transport_code: leg.transport_code.clone(),
            destination: leg.destination.clone(),
            current_location: current,
            route,
            estimated_arrival,
            calculated_at: now,
        }))
    }

    async fn find_leg(&self, transport_code: &str) -> ApiResult<TransportLeg> {
        let code = transport_code.trim();
        if code.is_empty() {
            return Err(ApiError::InvalidInput("运输单号不能为空".to_string()));
        }
        self.reader
            .find_leg(code)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("运输记录不存在: {}", code)))
    }
}

// ==========================================
// 响应结构
// ==========================================

/// 路线详情
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDetailsView {
    pub leg: TransportLeg,
    pub risk_flag: RiskFlag,
    pub route: Option<RouteEstimate>,
}

/// 到达时间估算
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationEta {
    pub transport_code: String,
    pub destination: LegEndpoint,
    pub current_location: GeoPoint,
    pub route: RouteEstimate,
    pub estimated_arrival: DateTime<Utc>,
    pub calculated_at: DateTime<Utc>,
}
