// ==========================================
// 农产品供应链追溯系统 - 冷链风险与路线估算引擎
// ==========================================
// 职责: 温度 → 风险标记; 坐标对 → 球面距离与时长估算
// 说明: 路线时长 = 球面距离 / 名义车速,是估算值,不是真实路径规划
// 红线: 纯函数,无 I/O,缺坐标返回 None 而不是错误
// ==========================================

use crate::config::trace_config::RiskRouteConfig;
use crate::domain::transport::{RouteEstimate, TransportLeg};
use crate::domain::types::{GeoPoint, RiskFlag};

/// 地球半径 (米,WGS84 长半轴)
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

// ==========================================
// LegColdChain - 单段运输的冷链评估结果
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegColdChain {
    pub risk_flag: RiskFlag,
    pub max_temperature_celsius: Option<f64>,
    pub high_risk_samples: usize,
}

// ==========================================
// RiskRouteEvaluator - 冷链风险与路线估算
// ==========================================
pub struct RiskRouteEvaluator {
    config: RiskRouteConfig,
}

impl RiskRouteEvaluator {
    /// 构造函数 (阈值与车速由配置注入)
    pub fn new(config: RiskRouteConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RiskRouteConfig {
        &self.config
    }

    // ==========================================
    // 冷链风险
    // ==========================================

    /// 温度风险判定: 严格高于阈值才是高风险
    pub fn evaluate_risk(&self, temperature_celsius: f64) -> RiskFlag {
        if temperature_celsius > self.config.risk_threshold_celsius {
            RiskFlag::HighRisk
        } else {
            RiskFlag::Normal
        }
    }

    /// 单段运输的冷链评估
    ///
    /// # 规则
    /// - 风险标记取最近一次采样的判定结果
    /// - 无采样时沿用落库的风险标记
    /// - 统计最高温度与超阈值采样数
    pub fn evaluate_leg(&self, leg: &TransportLeg) -> LegColdChain {
        let risk_flag = leg
            .latest_temperature_sample()
            .map(|sample| self.evaluate_risk(sample.temperature_celsius))
            .unwrap_or(leg.risk_flag);

        let max_temperature_celsius = leg
            .temperature_logs
            .iter()
            .map(|sample| sample.temperature_celsius)
            .fold(None, |max: Option<f64>, t| match max {
                Some(m) if m >= t => Some(m),
                _ => Some(t),
            });

        let high_risk_samples = leg
            .temperature_logs
            .iter()
            .filter(|sample| self.evaluate_risk(sample.temperature_celsius) == RiskFlag::HighRisk)
            .count();

        LegColdChain {
            risk_flag,
            max_temperature_celsius,
            high_risk_samples,
        }
    }

    // ==========================================
    // 路线估算
    // ==========================================

    /// 估算两点间的距离与时长
    ///
    /// # 返回
    /// - Some(RouteEstimate): 两端坐标齐全
    /// - None: 任一端缺坐标 (无路线数据,不是失败)
    pub fn estimate_route(
        &self,
        origin: Option<GeoPoint>,
        destination: Option<GeoPoint>,
    ) -> Option<RouteEstimate> {
        let (origin, destination) = match (origin, destination) {
            (Some(o), Some(d)) => (o, d),
            _ => return None,
        };

        let distance_meters = great_circle_distance_m(origin, destination);
        let distance_km = distance_meters as f64 / 1000.0;
        let duration_seconds = if self.config.nominal_speed_kmh > 0.0 {
            (distance_km / self.config.nominal_speed_kmh * 3600.0).round() as u64
        } else {
            0
        };

        Some(RouteEstimate {
            distance_meters,
            duration_seconds,
            distance_text: format_distance(distance_meters),
            duration_text: format_duration(duration_seconds),
            start_address: None,
            end_address: None,
        })
    }

    /// 运输段起止点的路线估算 (附起止地址摘要)
    pub fn estimate_leg_route(&self, leg: &TransportLeg) -> Option<RouteEstimate> {
        self.estimate_route(leg.origin.coordinates, leg.destination.coordinates)
            .map(|route| route.with_addresses(&leg.origin, &leg.destination))
    }
}

impl Default for RiskRouteEvaluator {
    fn default() -> Self {
        Self::new(RiskRouteConfig::default())
    }
}

// ==========================================
// 距离与文本格式化
// ==========================================

/// Haversine 球面距离 (米,四舍五入到整数)
pub fn great_circle_distance_m(from: GeoPoint, to: GeoPoint) -> u64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lng = (to.longitude - from.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    (EARTH_RADIUS_M * c).round() as u64
}

/// 距离文本: 不足 1000 米显示 "{m} m",否则 "{km:.2} km"
pub fn format_distance(distance_meters: u64) -> String {
    if distance_meters < 1000 {
        format!("{} m", distance_meters)
    } else {
        format!("{:.2} km", distance_meters as f64 / 1000.0)
    }
}

/// 时长文本: 不足 60 分钟显示 "{n} mins",否则 "{h} hrs {m} mins" (整点省略分钟)
pub fn format_duration(duration_seconds: u64) -> String {
    let minutes = (duration_seconds as f64 / 60.0).round() as u64;
    if minutes < 60 {
        return format!("{} mins", minutes);
    }
    let hours = minutes / 60;
    let rest = minutes % 60;
    if rest == 0 {
        format!("{} hrs", hours)
    } else {
        format!("{} hrs {} mins", hours, rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::party::{PartyProfile, PartyRole};
    use crate::domain::transport::{LegEndpoint, TemperatureSample};
    use crate::domain::types::{DeliveryStatus, SurrogateId};
    use chrono::{TimeZone, Utc};

    fn sample(hour: u32, temperature: f64) -> TemperatureSample {
        TemperatureSample {
            timestamp: Some(Utc.with_ymd_and_hms(2023, 10, 2, hour, 0, 0).unwrap()),
            temperature_celsius: temperature,
            location: None,
        }
    }

    fn leg_with_logs(logs: Vec<TemperatureSample>, stored: RiskFlag) -> TransportLeg {
        let now = Utc.with_ymd_and_hms(2023, 10, 1, 0, 0, 0).unwrap();
        TransportLeg {
            id: SurrogateId::generate(),
            transport_code: "TR-001".to_string(),
            batch_id: SurrogateId::generate(),
            transporter: PartyProfile {
                party_id: "u-1".to_string(),
                username: "driver".to_string(),
                email: "d@example.com".to_string(),
                first_name: "Dan".to_string(),
                last_name: "Lee".to_string(),
                contact_number: None,
                role: PartyRole::Distributor,
                address: None,
            },
            origin: LegEndpoint {
                location_name: "Farm".to_string(),
                address: None,
                coordinates: Some(GeoPoint::new(0.0, 0.0)),
            },
            destination: LegEndpoint {
                location_name: "Depot".to_string(),
                address: None,
                coordinates: Some(GeoPoint::new(0.01, 0.0)),
            },
            departure_time: Some(now),
            estimated_arrival_time: None,
            actual_arrival_time: None,
            vehicle: None,
            driver: None,
            temperature_logs: logs,
            risk_flag: stored,
            status: DeliveryStatus::InTransit,
            condition_notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_evaluate_risk_阈值边界() {
        let evaluator = RiskRouteEvaluator::default();
        assert_eq!(evaluator.evaluate_risk(8.0), RiskFlag::Normal);
        assert_eq!(evaluator.evaluate_risk(8.01), RiskFlag::HighRisk);
        assert_eq!(evaluator.evaluate_risk(-20.0), RiskFlag::Normal);
    }

    #[test]
    fn test_evaluate_risk_自定义阈值() {
        let evaluator = RiskRouteEvaluator::new(RiskRouteConfig {
            risk_threshold_celsius: 4.0,
            nominal_speed_kmh: 60.0,
        });
        assert_eq!(evaluator.evaluate_risk(5.0), RiskFlag::HighRisk);
    }

    #[test]
    fn test_estimate_route_缺坐标返回none() {
        let evaluator = RiskRouteEvaluator::default();
        let p = Some(GeoPoint::new(77.59, 12.97));
        assert!(evaluator.estimate_route(None, p).is_none());
        assert!(evaluator.estimate_route(p, None).is_none());
        assert!(evaluator.estimate_route(None, None).is_none());
    }

    #[test]
    fn test_estimate_route_赤道短距离() {
        let evaluator = RiskRouteEvaluator::default();
        let route = evaluator
            .estimate_route(Some(GeoPoint::new(0.0, 0.0)), Some(GeoPoint::new(0.01, 0.0)))
            .unwrap();
        assert_eq!(route.distance_meters, 1113);
        assert_eq!(route.distance_text, "1.11 km");
        assert_eq!(route.duration_seconds, 67);
        assert_eq!(route.duration_text, "1 mins");

        let short = evaluator
            .estimate_route(Some(GeoPoint::new(0.0, 0.0)), Some(GeoPoint::new(0.005, 0.0)))
            .unwrap();
        assert_eq!(short.distance_text, "557 m");
        assert!(short.duration_seconds > 0);
    }

    #[test]
    fn test_format_distance_千米切换() {
        assert_eq!(format_distance(999), "999 m");
        assert_eq!(format_distance(1000), "1.00 km");
        assert_eq!(format_distance(12_346), "12.35 km");
    }

    #[test]
    fn test_format_duration_小时切换() {
        assert_eq!(format_duration(0), "0 mins");
        assert_eq!(format_duration(59 * 60), "59 mins");
        assert_eq!(format_duration(3600), "1 hrs");
        assert_eq!(format_duration(5400), "1 hrs 30 mins");
        assert_eq!(format_duration(7200), "2 hrs");
    }

    #[test]
    fn test_format_distance_输出稳定() {
        let evaluator = RiskRouteEvaluator::default();
        let a = Some(GeoPoint::new(77.5946, 12.9716));
        let b = Some(GeoPoint::new(78.4867, 17.3850));
        let first = evaluator.estimate_route(a, b).unwrap();
        let second = evaluator.estimate_route(a, b).unwrap();
        assert_eq!(first, second);
        assert_eq!(format_distance(first.distance_meters), first.distance_text);
        assert!(first.distance_text.ends_with(" km"));
    }

    #[test]
    fn test_evaluate_leg_取最近采样() {
        let evaluator = RiskRouteEvaluator::default();

        // 早先超温,最近一次恢复正常
        let leg = leg_with_logs(vec![sample(9, 4.0), sample(8, 12.5)], RiskFlag::Normal);
        let cold_chain = evaluator.evaluate_leg(&leg);
        assert_eq!(cold_chain.risk_flag, RiskFlag::Normal);
        assert_eq!(cold_chain.max_temperature_celsius, Some(12.5));
        assert_eq!(cold_chain.high_risk_samples, 1);

        let hot = leg_with_logs(vec![sample(8, 4.0), sample(9, 9.0)], RiskFlag::Normal);
        assert_eq!(evaluator.evaluate_leg(&hot).risk_flag, RiskFlag::HighRisk);
    }

    #[test]
    fn test_evaluate_leg_无采样沿用落库标记() {
        let evaluator = RiskRouteEvaluator::default();
        let leg = leg_with_logs(Vec::new(), RiskFlag::HighRisk);
        let cold_chain = evaluator.evaluate_leg(&leg);
        assert_eq!(cold_chain.risk_flag, RiskFlag::HighRisk);
        assert_eq!(cold_chain.max_temperature_celsius, None);
        assert_eq!(cold_chain.high_risk_samples, 0);
    }

    #[test]
    fn test_estimate_leg_route_附地址() {
        let evaluator = RiskRouteEvaluator::default();
        let leg = leg_with_logs(Vec::new(), RiskFlag::Normal);
        let route = evaluator.estimate_leg_route(&leg).unwrap();
        assert_eq!(route.start_address.as_deref(), Some("Farm, , "));
        assert_eq!(route.end_address.as_deref(), Some("Depot, , "));
    }
}
