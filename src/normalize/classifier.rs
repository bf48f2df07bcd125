//! Metric classification
//!
//! Every metric the dashboard queries is a [`KnownMetric`]; its shape,
//! aggregation policy and merchant-only status are decided by exhaustive
//! matches, so adding a metric forces a decision for each.

use std::collections::HashMap;

use crate::models::MetricShape;
use crate::trends::AggregationPolicy;

/// Metric identifiers understood by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownMetric {
    // Scalars
    TotalRevenue,
    TotalTransactions,
    AvgTicket,
    TotalCustomers,
    NewCustomers,
    ReturningCustomers,
    RewardedAmount,
    RewardedPoints,
    RedeemedAmount,
    RedeemedPoints,
    BonusProgramAmount,
    // Daily series
    RevenuePerDay,
    TransactionsPerDay,
    CustomersPerDay,
    AvgTicketPerDay,
    // Breakdowns
    RevenueByChannel,
    TransactionsByChannel,
    RevenueByAgeGroup,
    RevenueByGender,
    TransactionsByWeekday,
    TransactionsByHour,
    RevenueByInterest,
}

impl KnownMetric {
    pub const ALL: [KnownMetric; 22] = [
        KnownMetric::TotalRevenue,
        KnownMetric::TotalTransactions,
        KnownMetric::AvgTicket,
        KnownMetric::TotalCustomers,
        KnownMetric::NewCustomers,
        KnownMetric::ReturningCustomers,
        KnownMetric::RewardedAmount,
        KnownMetric::RewardedPoints,
        KnownMetric::RedeemedAmount,
        KnownMetric::RedeemedPoints,
        KnownMetric::BonusProgramAmount,
        KnownMetric::RevenuePerDay,
        KnownMetric::TransactionsPerDay,
        KnownMetric::CustomersPerDay,
        KnownMetric::AvgTicketPerDay,
        KnownMetric::RevenueByChannel,
        KnownMetric::TransactionsByChannel,
        KnownMetric::RevenueByAgeGroup,
        KnownMetric::RevenueByGender,
        KnownMetric::TransactionsByWeekday,
        KnownMetric::TransactionsByHour,
        KnownMetric::RevenueByInterest,
    ];

    /// Identifier used by the API
    pub fn id(self) -> &'static str {
        match self {
            KnownMetric::TotalRevenue => "total_revenue",
            KnownMetric::TotalTransactions => "total_transactions",
            KnownMetric::AvgTicket => "avg_ticket",
            KnownMetric::TotalCustomers => "total_customers",
            KnownMetric::NewCustomers => "new_customers",
            KnownMetric::ReturningCustomers => "returning_customers",
            KnownMetric::RewardedAmount => "rewarded_amount",
            KnownMetric::RewardedPoints => "rewarded_points",
            KnownMetric::RedeemedAmount => "redeemed_amount",
            KnownMetric::RedeemedPoints => "redeemed_points",
            KnownMetric::BonusProgramAmount => "bonus_program_amount",
            KnownMetric::RevenuePerDay => "revenue_per_day",
            KnownMetric::TransactionsPerDay => "transactions_per_day",
            KnownMetric::CustomersPerDay => "customers_per_day",
            KnownMetric::AvgTicketPerDay => "avg_ticket_per_day",
            KnownMetric::RevenueByChannel => "revenue_by_channel",
            KnownMetric::TransactionsByChannel => "transactions_by_channel",
            KnownMetric::RevenueByAgeGroup => "revenue_by_age_group",
            KnownMetric::RevenueByGender => "revenue_by_gender",
            KnownMetric::TransactionsByWeekday => "transactions_by_weekday",
            KnownMetric::TransactionsByHour => "transactions_by_hour",
            KnownMetric::RevenueByInterest => "revenue_by_interest",
        }
    }

    pub fn shape(self) -> MetricShape {
        match self {
            KnownMetric::TotalRevenue
            | KnownMetric::TotalTransactions
            | KnownMetric::AvgTicket
            | KnownMetric::TotalCustomers
            | KnownMetric::NewCustomers
            | KnownMetric::ReturningCustomers
            | KnownMetric::RewardedAmount
            | KnownMetric::RewardedPoints
            | KnownMetric::RedeemedAmount
            | KnownMetric::RedeemedPoints
            | KnownMetric::BonusProgramAmount => MetricShape::Scalar,
            KnownMetric::RevenuePerDay
            | KnownMetric::TransactionsPerDay
            | KnownMetric::CustomersPerDay
            | KnownMetric::AvgTicketPerDay => MetricShape::TimeSeries,
            KnownMetric::RevenueByChannel
            | KnownMetric::TransactionsByChannel
            | KnownMetric::RevenueByAgeGroup
            | KnownMetric::RevenueByGender
            | KnownMetric::TransactionsByWeekday
            | KnownMetric::TransactionsByHour
            | KnownMetric::RevenueByInterest => MetricShape::Categorical,
        }
    }

    /// How daily values combine into coarser buckets
    pub fn aggregation_policy(self) -> AggregationPolicy {
        match self {
            KnownMetric::AvgTicket | KnownMetric::AvgTicketPerDay => AggregationPolicy::Mean,
            KnownMetric::TotalRevenue
            | KnownMetric::TotalTransactions
            | KnownMetric::TotalCustomers
            | KnownMetric::NewCustomers
            | KnownMetric::ReturningCustomers
            | KnownMetric::RewardedAmount
            | KnownMetric::RewardedPoints
            | KnownMetric::RedeemedAmount
            | KnownMetric::RedeemedPoints
            | KnownMetric::BonusProgramAmount
            | KnownMetric::RevenuePerDay
            | KnownMetric::TransactionsPerDay
            | KnownMetric::CustomersPerDay
            | KnownMetric::RevenueByChannel
            | KnownMetric::TransactionsByChannel
            | KnownMetric::RevenueByAgeGroup
            | KnownMetric::RevenueByGender
            | KnownMetric::TransactionsByWeekday
            | KnownMetric::TransactionsByHour
            | KnownMetric::RevenueByInterest => AggregationPolicy::Sum,
        }
    }

    /// Loyalty, reward and customer-count figures never carry a
    /// competitor comparison
    pub fn is_merchant_only(self) -> bool {
        match self {
            KnownMetric::RewardedAmount
            | KnownMetric::RewardedPoints
            | KnownMetric::RedeemedAmount
            | KnownMetric::RedeemedPoints
            | KnownMetric::BonusProgramAmount
            | KnownMetric::TotalCustomers
            | KnownMetric::NewCustomers
            | KnownMetric::ReturningCustomers
            | KnownMetric::CustomersPerDay => true,
            KnownMetric::TotalRevenue
            | KnownMetric::TotalTransactions
            | KnownMetric::AvgTicket
            | KnownMetric::RevenuePerDay
            | KnownMetric::TransactionsPerDay
            | KnownMetric::AvgTicketPerDay
            | KnownMetric::RevenueByChannel
            | KnownMetric::TransactionsByChannel
            | KnownMetric::RevenueByAgeGroup
            | KnownMetric::RevenueByGender
            | KnownMetric::TransactionsByWeekday
            | KnownMetric::TransactionsByHour
            | KnownMetric::RevenueByInterest => false,
        }
    }

    /// Look up a metric by its API identifier
    pub fn from_id(metric_id: &str) -> Option<KnownMetric> {
        METRICS_BY_ID.get(metric_id).copied()
    }
}

lazy_static::lazy_static! {
    static ref METRICS_BY_ID: HashMap<&'static str, KnownMetric> =
        KnownMetric::ALL.iter().map(|m| (m.id(), *m)).collect();
}

/// Shape of a metric.
///
/// Unknown identifiers are treated as scalars; this never fails.
pub fn classify(metric_id: &str) -> MetricShape {
    match KnownMetric::from_id(metric_id) {
        Some(metric) => metric.shape(),
        None => {
            tracing::warn!("Unknown metric id '{}', treating as scalar", metric_id);
            MetricShape::Scalar
        }
    }
}

/// Aggregation policy of a metric; unknown identifiers sum
pub fn aggregation_policy(metric_id: &str) -> AggregationPolicy {
    KnownMetric::from_id(metric_id)
        .map(KnownMetric::aggregation_policy)
        .unwrap_or(AggregationPolicy::Sum)
}
