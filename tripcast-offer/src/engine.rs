use chrono::{Datelike, NaiveDate, Utc};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use tripcast_core::catalog::{Country, CountryRef, DestinationCatalog};
use tripcast_core::offer::OfferCanonical;
use tripcast_core::recommendation::{month_label, MonthRecommendation};
use tripcast_core::search::TrackedQuery;
use tripcast_core::supplier::{insight_or_fallback, InsightService, RawOfferSource};
use tripcast_core::CoreResult;
use tripcast_store::app_config::{Config, RecommendationConfig};

use crate::pipeline::OfferPipeline;

/// Best offers one country could offer for a month.
#[derive(Debug, Clone)]
pub struct CountryCandidate {
    pub country: CountryRef,
    pub cheapest: OfferCanonical,
    pub recommended: OfferCanonical,
    /// Score of `recommended`; the country's comparison score.
    pub score: f64,
    pub valid_offers: usize,
}

/// Per-country win counter, scoped to one 12-month build.
#[derive(Debug, Default)]
pub struct CountryUsage {
    wins: HashMap<String, u32>,
    cap: u32,
}

impl CountryUsage {
    pub fn new(cap: u32) -> Self {
        Self {
            wins: HashMap::new(),
            cap,
        }
    }

    pub fn wins(&self, country_code: &str) -> u32 {
        self.wins.get(country_code).copied().unwrap_or(0)
    }

    pub fn record(&mut self, country_code: &str) {
        *self.wins.entry(country_code.to_string()).or_insert(0) += 1;
    }

    /// Picks from candidates already sorted best-first.
    ///
    /// With diversification the first country still under the cap wins; once
    /// every candidate is capped the overall best wins anyway.
    pub fn choose<'a>(&self, sorted: &'a [CountryCandidate], diversify: bool) -> Option<&'a CountryCandidate> {
        if diversify {
            if let Some(c) = sorted.iter().find(|c| self.wins(&c.country.code) < self.cap) {
                return Some(c);
            }
        }
        sorted.first()
    }
}

/// Ascending score, ties by country code.
pub fn sort_candidates(candidates: &mut [CountryCandidate]) {
    candidates.sort_by(|a, b| {
        a.score
            .partial_cmp(&b.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.country.code.cmp(&b.country.code))
    });
}

/// Days sampled within a month, spread from the 1st to the 28th.
pub fn sample_days(samples: u32) -> Vec<u32> {
    let span = samples.saturating_sub(1).max(1) as f64;
    let mut days: Vec<u32> = (0..samples)
        .map(|i| (1 + (i as f64 / span * 27.0).floor() as u32).min(28))
        .collect();
    days.dedup();
    days
}

/// Builds the year of monthly destination picks.
pub struct RecommendationEngine {
    source: Arc<dyn RawOfferSource>,
    insights: Arc<dyn InsightService>,
    catalog: DestinationCatalog,
    pipeline: OfferPipeline,
    config: RecommendationConfig,
}

impl RecommendationEngine {
    pub fn new(
        config: &Config,
        source: Arc<dyn RawOfferSource>,
        insights: Arc<dyn InsightService>,
    ) -> Self {
        Self {
            source,
            insights,
            catalog: DestinationCatalog::default(),
            pipeline: OfferPipeline::from_config(config),
            config: config.recommendation.clone(),
        }
    }

    pub fn with_catalog(mut self, catalog: DestinationCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn horizon_year(&self) -> i32 {
        self.config.horizon_year.unwrap_or_else(|| Utc::now().year())
    }

    /// One recommendation per month that has at least one valid offer.
    ///
    /// Every call starts with a fresh usage counter; nothing is cached between calls.
    pub async fn get_monthly_recommendations(&self, query: &TrackedQuery) -> CoreResult<Vec<MonthRecommendation>> {
        query.validate()?;

        let year = self.horizon_year();
        let mut usage = CountryUsage::new(self.config.diversification_cap);
        let mut months = Vec::new();

        for month in 0..12u32 {
            let label = month_label(month)?;

            // 1. Gather per-country candidates
            let mut candidates = self.month_candidates(query, year, month).await;
            if candidates.is_empty() {
                tracing::info!("No valid offers for {} {}, skipping month", label, year);
                continue;
            }

            // 2. Pick the winner under the diversification cap
            sort_candidates(&mut candidates);
            let winner = match usage.choose(&candidates, query.diversify) {
                Some(c) => c.clone(),
                None => continue,
            };
            usage.record(&winner.country.code);

            tracing::info!(
                "{} {}: {} wins with score {:.4} ({} of {} countries had valid offers)",
                label,
                year,
                winner.country.name,
                winner.score,
                candidates.len(),
                self.catalog.countries().len()
            );

            // 3. Describe the pick
            let insight = insight_or_fallback(
                self.insights.as_ref(),
                &winner.country.name,
                label,
                winner.recommended.display_price(),
                winner.recommended.total_stops(),
            )
            .await;

            months.push(MonthRecommendation {
                month,
                year,
                country: winner.country,
                cheapest: winner.cheapest,
                recommended: winner.recommended,
                score: winner.score,
                insight,
                refreshed_at: Utc::now(),
                verified: false,
                verified_offer: None,
                user_price: None,
                verified_at: None,
            });
        }

        tracing::info!(
            "Built {} monthly recommendations from {} for {}",
            months.len(),
            query.origin,
            query.passengers.summary()
        );
        Ok(months)
    }

    /// Candidates for every country with at least one valid offer this month.
    pub async fn month_candidates(&self, query: &TrackedQuery, year: i32, month: u32) -> Vec<CountryCandidate> {
        let days = sample_days(self.config.samples_per_month);
        let mut candidates = Vec::new();

        for country in self.catalog.countries() {
            let mut valid = Vec::new();

            for airport in &country.airports {
                for &day in &days {
                    let Some(depart_date) = NaiveDate::from_ymd_opt(year, month + 1, day) else {
                        continue;
                    };

                    let raw_offers = match self.source.search_offers(query, depart_date, airport).await {
                        Ok(offers) => offers,
                        Err(e) => {
                            tracing::warn!("Offer source failed for {} on {}: {}", airport.iata, depart_date, e);
                            continue;
                        }
                    };

                    valid.extend(
                        raw_offers
                            .into_iter()
                            .map(|raw| self.pipeline.process(raw))
                            .filter(|offer| offer.is_valid()),
                    );
                }
            }

            if let Some(candidate) = self.build_candidate(country, valid) {
                candidates.push(candidate);
            }
        }

        candidates
    }

    /// Cheapest and best-scored offer, chosen independently.
    fn build_candidate(&self, country: &Country, offers: Vec<OfferCanonical>) -> Option<CountryCandidate> {
        let cheapest = offers.iter().min_by_key(|o| o.display_price())?.clone();
        let (recommended, score) = offers
            .iter()
            .map(|o| (o, self.pipeline.score(o)))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))?;

        Some(CountryCandidate {
            country: country.reference(),
            cheapest,
            recommended: recommended.clone(),
            score,
            valid_offers: offers.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{raw_one_stop, raw_round_trip};
    use async_trait::async_trait;
    use tripcast_core::catalog::{Airport, Country};
    use tripcast_core::search::{Passengers, RawOffer};
    use tripcast_core::supplier::FALLBACK_INSIGHT;

    /// Returns fixed offers per destination airport; unknown airports error.
    struct ScriptedSource {
        offers: HashMap<String, Vec<RawOffer>>,
    }

    impl ScriptedSource {
        fn new(entries: Vec<(&str, Vec<RawOffer>)>) -> Self {
            Self {
                offers: entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
            }
        }
    }

    #[async_trait]
    impl RawOfferSource for ScriptedSource {
        async fn search_offers(
            &self,
            _query: &TrackedQuery,
            _depart_date: NaiveDate,
            destination: &Airport,
        ) -> Result<Vec<RawOffer>, Box<dyn std::error::Error + Send + Sync>> {
            self.offers
                .get(&destination.iata)
                .cloned()
                .ok_or_else(|| format!("no route to {}", destination.iata).into())
        }
    }

    struct EchoInsight;

    #[async_trait]
    impl InsightService for EchoInsight {
        async fn describe(
            &self,
            country_name: &str,
            month_label: &str,
            price: i64,
            _stops: u32,
        ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
            Ok(format!("{} in {} from {}", country_name, month_label, price))
        }
    }

    struct SilentInsight;

    #[async_trait]
    impl InsightService for SilentInsight {
        async fn describe(
            &self,
            _country_name: &str,
            _month_label: &str,
            _price: i64,
            _stops: u32,
        ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
            Err("insight backend down".into())
        }
    }

    fn country(code: &str, name: &str, airports: &[&str]) -> Country {
        Country {
            code: code.to_string(),
            name: name.to_string(),
            airports: airports
                .iter()
                .map(|a| Airport {
                    iata: a.to_string(),
                    city: a.to_string(),
                })
                .collect(),
        }
    }

    fn engine(source: ScriptedSource, countries: Vec<Country>) -> RecommendationEngine {
        let mut config = Config::default();
        config.recommendation.horizon_year = Some(2025);
        RecommendationEngine::new(&config, Arc::new(source), Arc::new(EchoInsight))
            .with_catalog(DestinationCatalog::new(countries))
    }

    fn query() -> TrackedQuery {
        TrackedQuery::new("MNL", 5, Passengers::default())
    }

    #[test]
    fn test_sample_days() {
        assert_eq!(sample_days(5), vec![1, 7, 14, 21, 28]);
        assert_eq!(sample_days(1), vec![1]);
        assert_eq!(sample_days(2), vec![1, 28]);
    }

    #[test]
    fn test_usage_cap_and_fallback() {
        let offer = crate::pipeline::OfferPipeline::default().process(raw_round_trip("NRT", "PR", 300.0));
        let candidate = |code: &str, score: f64| CountryCandidate {
            country: CountryRef {
                code: code.to_string(),
                name: code.to_string(),
            },
            cheapest: offer.clone(),
            recommended: offer.clone(),
            score,
            valid_offers: 1,
        };
        let sorted = vec![candidate("JP", 0.1), candidate("KR", 0.2)];

        let mut usage = CountryUsage::new(2);
        usage.record("JP");
        usage.record("JP");
        assert_eq!(usage.choose(&sorted, true).unwrap().country.code, "KR");
        assert_eq!(usage.choose(&sorted, false).unwrap().country.code, "JP");

        usage.record("KR");
        usage.record("KR");
        assert_eq!(usage.choose(&sorted, true).unwrap().country.code, "JP");
    }

    #[test]
    fn test_ties_broken_by_country_code() {
        let offer = crate::pipeline::OfferPipeline::default().process(raw_round_trip("NRT", "PR", 300.0));
        let mut candidates: Vec<CountryCandidate> = ["TW", "HK", "JP"]
            .iter()
            .map(|code| CountryCandidate {
                country: CountryRef {
                    code: code.to_string(),
                    name: code.to_string(),
                },
                cheapest: offer.clone(),
                recommended: offer.clone(),
                score: 0.5,
                valid_offers: 1,
            })
            .collect();
        sort_candidates(&mut candidates);
        let codes: Vec<_> = candidates.iter().map(|c| c.country.code.as_str()).collect();
        assert_eq!(codes, vec!["HK", "JP", "TW"]);
    }

    #[tokio::test]
    async fn test_diversification_caps_wins() {
        let source = ScriptedSource::new(vec![
            ("NRT", vec![raw_round_trip("NRT", "PR", 200.0)]),
            ("ICN", vec![raw_round_trip("ICN", "KE", 250.0)]),
            ("BKK", vec![raw_round_trip("BKK", "TG", 300.0)]),
        ]);
        let countries = vec![
            country("JP", "Japan", &["NRT"]),
            country("KR", "South Korea", &["ICN"]),
            country("TH", "Thailand", &["BKK"]),
        ];
        let months = engine(source, countries).get_monthly_recommendations(&query()).await.unwrap();

        assert_eq!(months.len(), 12);
        let order: Vec<_> = months.iter().map(|m| m.country.code.as_str()).collect();
        assert_eq!(&order[..6], &["JP", "JP", "KR", "KR", "TH", "TH"]);
        // Everyone capped: best overall wins from here on
        assert!(order[6..].iter().all(|c| *c == "JP"));
        assert_eq!(months[0].insight, "Japan in Jan from 11290");
        assert_eq!(months[0].year, 2025);
    }

    #[tokio::test]
    async fn test_without_diversification_best_always_wins() {
        let source = ScriptedSource::new(vec![
            ("NRT", vec![raw_round_trip("NRT", "PR", 200.0)]),
            ("ICN", vec![raw_round_trip("ICN", "KE", 250.0)]),
        ]);
        let countries = vec![country("JP", "Japan", &["NRT"]), country("KR", "South Korea", &["ICN"])];
        let mut q = query();
        q.diversify = false;

        let months = engine(source, countries).get_monthly_recommendations(&q).await.unwrap();
        assert!(months.iter().all(|m| m.country.code == "JP"));
    }

    #[tokio::test]
    async fn test_quarantined_only_country_excluded() {
        // Cebu Pacific to SFO at 150 USD is quarantined twice over
        let source = ScriptedSource::new(vec![
            ("SFO", vec![raw_round_trip("SFO", "5J", 150.0)]),
            ("ICN", vec![raw_round_trip("ICN", "KE", 400.0)]),
        ]);
        let countries = vec![
            country("US", "United States", &["SFO"]),
            country("KR", "South Korea", &["ICN"]),
        ];
        let engine = engine(source, countries);

        let candidates = engine.month_candidates(&query(), 2025, 0).await;
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].country.code, "KR");

        let months = engine.get_monthly_recommendations(&query()).await.unwrap();
        assert!(months.iter().all(|m| m.country.code == "KR"));
        assert!(months.iter().all(|m| m.cheapest.is_valid() && m.recommended.is_valid()));
    }

    #[tokio::test]
    async fn test_cheapest_and_recommended_chosen_independently() {
        // Slightly cheaper but with a stop: cheapest, not recommended
        let source = ScriptedSource::new(vec![(
            "NRT",
            vec![raw_one_stop("NRT", "HKG", "CX", 280.0), raw_round_trip("NRT", "PR", 300.0)],
        )]);
        let engine = engine(source, vec![country("JP", "Japan", &["NRT"])]);

        let candidates = engine.month_candidates(&query(), 2025, 3).await;
        let jp = &candidates[0];
        assert_eq!(jp.cheapest.total_stops(), 1);
        assert_eq!(jp.recommended.total_stops(), 0);
        assert!(jp.cheapest.display_price() < jp.recommended.display_price());
        // Five sample days, two offers each
        assert_eq!(jp.valid_offers, 10);
    }

    #[tokio::test]
    async fn test_failing_source_skips_months() {
        let source = ScriptedSource::new(Vec::new());
        let engine = engine(source, vec![country("JP", "Japan", &["NRT"])]);
        let months = engine.get_monthly_recommendations(&query()).await.unwrap();
        assert!(months.is_empty());
    }

    #[tokio::test]
    async fn test_insight_failure_uses_fallback() {
        let source = ScriptedSource::new(vec![("NRT", vec![raw_round_trip("NRT", "PR", 200.0)])]);
        let mut config = Config::default();
        config.recommendation.horizon_year = Some(2025);
        let engine = RecommendationEngine::new(&config, Arc::new(source), Arc::new(SilentInsight))
            .with_catalog(DestinationCatalog::new(vec![country("JP", "Japan", &["NRT"])]));

        let months = engine.get_monthly_recommendations(&query()).await.unwrap();
        assert_eq!(months.len(), 12);
        assert!(months.iter().all(|m| m.insight == FALLBACK_INSIGHT));
    }

    #[tokio::test]
    async fn test_invalid_query_rejected() {
        let engine = engine(ScriptedSource::new(Vec::new()), Vec::new());
        let mut q = query();
        q.passengers.adults = 0;
        assert!(engine.get_monthly_recommendations(&q).await.is_err());
    }
}
