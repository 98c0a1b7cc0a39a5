//! Normalization of raw CMS property documents.

use std::sync::{Arc, LazyLock};
use std::time::{Duration, Instant};

use chrono::TimeDelta;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, error, info, trace};
use uuid::Uuid;

use super::ImageResolver;
use crate::domain::entities::{
    GENERIC_ALT, OptimizationLevel, PLACEHOLDER_URL, ProcessedProperty, PropertyType,
    ResolvedImage,
};
use crate::domain::errors::ProcessingError;
use crate::domain::ports::{Clock, PropertyCachePort};
use crate::domain::serde_utils::{
    any_truthy, count_field, first_present, non_empty_str, number_field, parse_cms_date,
};
use crate::infrastructure::config::ProcessorConfig;

/// Records processed per batch by [`PropertyProcessor::process_many`].
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Batch runs slower than this are reported.
pub const DEFAULT_SLOW_THRESHOLD: Duration = Duration::from_secs(1);

/// Listings published within this many days are flagged as new.
pub const FRESHNESS_DAYS: i64 = 30;

const DEFAULT_TITLE: &str = "Imóvel disponível";
const DEFAULT_CITY: &str = "Guararema";

const ID_FIELDS: [&str; 2] = ["_id", "id"];
const TITLE_FIELDS: [&str; 2] = ["titulo", "title"];
const PRICE_FIELDS: [&str; 2] = ["preco", "price"];
const AREA_FIELDS: [&str; 3] = ["areaUtil", "area", "areaTotal"];
const BEDROOM_FIELDS: [&str; 3] = ["dormitorios", "quartos", "bedrooms"];
const BATHROOM_FIELDS: [&str; 2] = ["banheiros", "bathrooms"];
const PARKING_FIELDS: [&str; 2] = ["vagas", "parkingSpots"];
const IMAGE_FIELDS: [&str; 3] = ["imagem", "mainImage", "imagemPrincipal"];
const GALLERY_FIELDS: [&str; 3] = ["galeria", "imagens", "images"];
const DATE_FIELDS: [&str; 3] = ["dataPublicacao", "publishedAt", "_createdAt"];
const HIGHLIGHT_FIELDS: [&str; 3] = ["destaque", "isHighlight", "featured"];
const PREMIUM_FIELDS: [&str; 3] = ["isPremium", "premium", "destaque"];

static NON_ALNUM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Converts raw CMS documents into [`ProcessedProperty`] records, memoizing
/// results in the injected cache.
pub struct PropertyProcessor {
    resolver: ImageResolver,
    cache: Arc<dyn PropertyCachePort>,
    clock: Arc<dyn Clock>,
    placeholder_url: String,
    default_alt: String,
    batch_size: usize,
    slow_threshold: Duration,
}

impl PropertyProcessor {
    /// Creates a processor with default batching.
    #[must_use]
    pub fn new(
        resolver: ImageResolver,
        cache: Arc<dyn PropertyCachePort>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            resolver,
            cache,
            clock,
            placeholder_url: PLACEHOLDER_URL.to_string(),
            default_alt: GENERIC_ALT.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            slow_threshold: DEFAULT_SLOW_THRESHOLD,
        }
    }

    /// Creates a processor from configuration.
    #[must_use]
    pub fn from_config(
        config: &ProcessorConfig,
        resolver: ImageResolver,
        cache: Arc<dyn PropertyCachePort>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::new(resolver, cache, clock)
            .with_batch_size(config.batch_size)
            .with_slow_threshold(Duration::from_millis(config.slow_batch_ms))
            .with_placeholder_url(&config.placeholder_url)
            .with_default_alt(&config.default_alt)
    }

    /// Sets the batch size (minimum 1).
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Sets the slow batch reporting threshold.
    #[must_use]
    pub const fn with_slow_threshold(mut self, threshold: Duration) -> Self {
        self.slow_threshold = threshold;
        self
    }

    /// Sets the url used for unresolvable images.
    #[must_use]
    pub fn with_placeholder_url(mut self, url: &str) -> Self {
        if !url.trim().is_empty() {
            self.placeholder_url = url.to_string();
        }
        self
    }

    /// Sets the alt text used for images of untitled listings.
    #[must_use]
    pub fn with_default_alt(mut self, alt: &str) -> Self {
        if !alt.trim().is_empty() {
            self.default_alt = alt.to_string();
        }
        self
    }

    /// Processes one raw document.
    ///
    /// Cached records are returned as-is with `cache_hit` set.
    ///
    /// # Errors
    ///
    /// Returns `ProcessingError` when the document is not an object or its
    /// identity field is unusable. The failure is logged with the record id
    /// and elapsed time.
    pub fn process(
        &self,
        raw: &Value,
        level: OptimizationLevel,
    ) -> Result<ProcessedProperty, ProcessingError> {
        let started = Instant::now();
        let result = self.process_document(raw, level);

        if let Err(err) = &result {
            let id = raw
                .as_object()
                .and_then(|object| non_empty_str(first_present(object, &ID_FIELDS)))
                .unwrap_or("unknown");
            error!(
                id,
                elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
                error = %err,
                "Failed to process property"
            );
        }

        result
    }

    /// Processes documents in fixed-size batches, dropping failed records.
    pub fn process_many(&self, raws: &[Value], level: OptimizationLevel) -> Vec<ProcessedProperty> {
        let started = Instant::now();
        let mut processed = Vec::with_capacity(raws.len());

        for (index, batch) in raws.chunks(self.batch_size).enumerate() {
            processed.extend(batch.iter().filter_map(|raw| self.process(raw, level).ok()));
            trace!(batch = index, size = batch.len(), "Processed property batch");
        }

        let elapsed = started.elapsed();
        if elapsed > self.slow_threshold {
            info!(
                total = raws.len(),
                processed = processed.len(),
                dropped = raws.len() - processed.len(),
                elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                "Slow property batch processing"
            );
        }

        processed
    }

    fn process_document(
        &self,
        raw: &Value,
        level: OptimizationLevel,
    ) -> Result<ProcessedProperty, ProcessingError> {
        let object = raw
            .as_object()
            .ok_or_else(|| ProcessingError::not_an_object(raw))?;

        let cms_id = cms_identity(object)?;
        let id = cms_id.clone().unwrap_or_else(|| self.generate_id());

        // Only CMS-supplied ids are cached.
        if cms_id.is_some()
            && let Some(cached) = self.cache.get(&id)
        {
            debug!(id = %id, "Serving property from cache");
            return Ok(cached.as_cache_hit());
        }

        let title = non_empty_str(first_present(object, &TITLE_FIELDS));
        let now = self.clock.now();
        let published_at = DATE_FIELDS
            .iter()
            .filter_map(|key| non_empty_str(object.get(*key)))
            .find_map(parse_cms_date);
        let is_new = published_at
            .is_some_and(|date| now - date < TimeDelta::days(FRESHNESS_DAYS));

        let alt = title.unwrap_or(self.default_alt.as_str());
        let main_image = self.main_image(object, alt, level);
        let gallery = self.gallery(object, alt, level);

        let property = ProcessedProperty {
            slug: derive_slug(object, &id, cms_id.as_deref(), title),
            id,
            title: title.unwrap_or(DEFAULT_TITLE).to_string(),
            location: non_empty_str(object.get("bairro")).map(str::to_string),
            city: non_empty_str(object.get("cidade"))
                .unwrap_or(DEFAULT_CITY)
                .to_string(),
            price: number_field(object, &PRICE_FIELDS).unwrap_or(0.0),
            property_type: property_type(object),
            area: number_field(object, &AREA_FIELDS),
            bedrooms: count_field(object, &BEDROOM_FIELDS),
            bathrooms: count_field(object, &BATHROOM_FIELDS),
            parking_spots: count_field(object, &PARKING_FIELDS),
            main_image,
            gallery,
            is_highlight: any_truthy(object, &HIGHLIGHT_FIELDS),
            is_premium: any_truthy(object, &PREMIUM_FIELDS),
            is_new,
            published_at,
            optimization_level: level,
            cache_hit: false,
        };

        if cms_id.is_some() {
            self.cache.set(&property.id, property.clone());
        }
        Ok(property)
    }

    fn main_image(
        &self,
        object: &Map<String, Value>,
        alt: &str,
        level: OptimizationLevel,
    ) -> ResolvedImage {
        let image = first_present(object, &IMAGE_FIELDS);
        if level.main_image_variants() {
            self.resolver
                .resolve_with_variants(image, &self.placeholder_url, alt)
        } else {
            self.resolver.resolve(image, &self.placeholder_url, alt)
        }
    }

    fn gallery(
        &self,
        object: &Map<String, Value>,
        alt: &str,
        level: OptimizationLevel,
    ) -> Vec<ResolvedImage> {
        let Some(images) = first_present(object, &GALLERY_FIELDS).and_then(Value::as_array) else {
            return Vec::new();
        };

        images
            .iter()
            .map(|image| {
                if level.gallery_variants() {
                    self.resolver
                        .resolve_with_variants(Some(image), &self.placeholder_url, alt)
                } else {
                    self.resolver.resolve(Some(image), &self.placeholder_url, alt)
                }
            })
            .filter(|image| image.url() != self.placeholder_url)
            .collect()
    }

    fn generate_id(&self) -> String {
        let suffix = Uuid::new_v4().simple().to_string();
        format!(
            "prop-{}-{}",
            self.clock.now().timestamp_millis(),
            &suffix[..9]
        )
    }
}

/// Reads the CMS-supplied identity, if any.
fn cms_identity(object: &Map<String, Value>) -> Result<Option<String>, ProcessingError> {
    match first_present(object, &ID_FIELDS) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string()).filter(|s| !s.is_empty())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(ProcessingError::invalid_identity(other)),
    }
}

fn property_type(object: &Map<String, Value>) -> PropertyType {
    let is = |key: &str, expected: &str| object.get(key).and_then(Value::as_str) == Some(expected);

    if is("finalidade", "Venda") || is("tipo", "venda") || is("tipoNegocio", "venda") {
        PropertyType::Sale
    } else {
        PropertyType::Rent
    }
}

/// Slug precedence: CMS slug object (`current`, then `_key`, then id), CMS
/// slug string, CMS id, slugified title, generated id.
fn derive_slug(
    object: &Map<String, Value>,
    id: &str,
    cms_id: Option<&str>,
    title: Option<&str>,
) -> String {
    match object.get("slug") {
        Some(Value::Object(slug)) => non_empty_str(slug.get("current"))
            .or_else(|| non_empty_str(slug.get("_key")))
            .unwrap_or(id)
            .to_string(),
        Some(Value::String(slug)) if !slug.trim().is_empty() => slug.clone(),
        _ => cms_id
            .map(str::to_string)
            .or_else(|| title.map(slugify).filter(|s| !s.is_empty()))
            .unwrap_or_else(|| id.to_string()),
    }
}

/// Lowercases and replaces runs of non-alphanumeric characters with `-`.
#[must_use]
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    NON_ALNUM_RE
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::{ManualClock, MockPropertyCachePort};
    use crate::infrastructure::cache::PropertyCache;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use test_case::test_case;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<parking_lot::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture_logs(f: impl FnOnce()) -> String {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        String::from_utf8_lossy(&logs.0.lock()).into_owned()
    }

    struct Fixture {
        processor: PropertyProcessor,
        cache: Arc<PropertyCache>,
    }

    fn fixture() -> Fixture {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap(),
        ));
        let cache = Arc::new(PropertyCache::new(100, 1800, clock.clone()));
        let processor = PropertyProcessor::new(
            ImageResolver::new("proj", "production"),
            cache.clone(),
            clock,
        );
        Fixture { processor, cache }
    }

    fn process(raw: &Value) -> ProcessedProperty {
        fixture()
            .processor
            .process(raw, OptimizationLevel::Basic)
            .unwrap()
    }

    #[test_case(json!(null) ; "null")]
    #[test_case(json!(42) ; "number")]
    #[test_case(json!([]) ; "array")]
    #[test_case(json!("casa") ; "string")]
    fn test_non_objects_are_rejected(raw: Value) {
        let result = fixture().processor.process(&raw, OptimizationLevel::Basic);
        assert!(matches!(result, Err(ProcessingError::NotAnObject { .. })));
    }

    #[test]
    fn test_unusable_identity_is_rejected() {
        let result = fixture()
            .processor
            .process(&json!({ "_id": { "nested": 1 } }), OptimizationLevel::Basic);
        assert!(matches!(result, Err(ProcessingError::InvalidIdentity { .. })));
    }

    #[test]
    fn test_end_to_end_record() {
        let raw = json!({
            "_id": "a1",
            "titulo": "Casa X",
            "preco": "350000",
            "finalidade": "Venda",
            "imagem": { "asset": { "_ref": "image-abc123-800x600-jpg" } }
        });
        let property = process(&raw);

        assert!((property.price - 350_000.0).abs() < f64::EPSILON);
        assert_eq!(property.property_type, PropertyType::Sale);
        assert!(property.main_image.url().ends_with("abc123-800x600.jpg"));
        assert_eq!(property.slug, "a1");
        assert_eq!(property.main_image.alt(), "Casa X");
        assert!(!property.cache_hit);
    }

    #[test]
    fn test_numeric_coercion_never_nan() {
        let raw = json!({
            "_id": "n1",
            "preco": "sob consulta",
            "areaUtil": "abc",
            "area": "95.5",
            "dormitorios": "três",
            "banheiros": 2,
            "vagas": "0"
        });
        let property = process(&raw);

        assert!(property.price.abs() < f64::EPSILON);
        assert_eq!(property.area, Some(95.5));
        assert_eq!(property.bedrooms, None);
        assert_eq!(property.bathrooms, Some(2));
        assert_eq!(property.parking_spots, None);
    }

    #[test_case(json!({ "finalidade": "Venda" }), PropertyType::Sale ; "finalidade")]
    #[test_case(json!({ "tipo": "venda" }), PropertyType::Sale ; "tipo")]
    #[test_case(json!({ "tipoNegocio": "venda" }), PropertyType::Sale ; "tipo negocio")]
    #[test_case(json!({ "finalidade": "Aluguel" }), PropertyType::Rent ; "rent")]
    #[test_case(json!({}), PropertyType::Rent ; "no field")]
    fn test_property_type(raw: Value, expected: PropertyType) {
        let object = raw.as_object().unwrap();
        assert_eq!(property_type(object), expected);
    }

    #[test_case(json!({ "_id": "a1", "slug": { "current": "casa-x" } }), "casa-x" ; "slug current")]
    #[test_case(json!({ "_id": "a1", "slug": { "_key": "k1" } }), "k1" ; "slug key")]
    #[test_case(json!({ "_id": "a1", "slug": {} }), "a1" ; "empty slug object")]
    #[test_case(json!({ "_id": "a1", "slug": "Casa-X" }), "Casa-X" ; "slug string as is")]
    #[test_case(json!({ "_id": "a1", "titulo": "Casa X" }), "a1" ; "id before title")]
    #[test_case(json!({ "titulo": "Casa na Praia, 3 quartos!" }), "casa-na-praia-3-quartos" ; "slugified title")]
    fn test_slug_precedence(raw: Value, expected: &str) {
        assert_eq!(process(&raw).slug, expected);
    }

    #[test]
    fn test_generated_identity() {
        let property = process(&json!({ "preco": 10 }));

        assert!(property.id.starts_with("prop-"));
        assert_eq!(property.id.split('-').count(), 3);
        assert_eq!(property.slug, property.id);
    }

    #[test_case("2024-06-01", true ; "two weeks old")]
    #[test_case("2024-04-01T00:00:00Z", false ; "over a month old")]
    #[test_case("not a date", false ; "unparseable")]
    fn test_freshness(date: &str, expected: bool) {
        let property = process(&json!({ "_id": "d1", "dataPublicacao": date }));
        assert_eq!(property.is_new, expected);
    }

    #[test]
    fn test_flags() {
        let property = process(&json!({ "_id": "f1", "destaque": true }));
        assert!(property.is_highlight);
        assert!(property.is_premium);

        let property = process(&json!({ "_id": "f2", "isPremium": "true" }));
        assert!(!property.is_highlight);
        assert!(property.is_premium);
    }

    #[test]
    fn test_second_process_is_cache_hit() {
        let Fixture { processor, cache } = fixture();
        let raw = json!({ "_id": "c1", "titulo": "Apartamento" });

        let first = processor.process(&raw, OptimizationLevel::Basic).unwrap();
        let second = processor.process(&raw, OptimizationLevel::Basic).unwrap();

        assert!(!first.cache_hit);
        assert!(second.cache_hit);
        assert_eq!(second.title, first.title);
        assert!(cache.has("c1"));
    }

    #[test]
    fn test_cache_hit_skips_recomputation() {
        let cached = ProcessedProperty {
            title: "Do cache".to_string(),
            ..process(&json!({ "_id": "m1" }))
        };

        let mut cache = MockPropertyCachePort::new();
        cache
            .expect_get()
            .withf(|id: &str| id == "m1")
            .times(1)
            .returning(move |_| Some(cached.clone()));
        cache.expect_set().never();

        let processor = PropertyProcessor::new(
            ImageResolver::new("proj", "production"),
            Arc::new(cache),
            Arc::new(ManualClock::starting_now()),
        );
        let property = processor
            .process(&json!({ "_id": "m1", "titulo": "Novo" }), OptimizationLevel::Basic)
            .unwrap();

        assert_eq!(property.title, "Do cache");
        assert!(property.cache_hit);
    }

    #[test]
    fn test_identity_less_records_bypass_cache() {
        let clock = Arc::new(ManualClock::starting_now());
        let cache = Arc::new(PropertyCache::new(5, 1800, clock.clone()));
        let processor = PropertyProcessor::new(
            ImageResolver::new("proj", "production"),
            cache.clone(),
            clock,
        );

        processor
            .process(&json!({ "_id": "real" }), OptimizationLevel::Basic)
            .unwrap();
        for _ in 0..10 {
            processor
                .process(&json!({ "titulo": "Sem id" }), OptimizationLevel::Basic)
                .unwrap();
        }

        assert_eq!(cache.len(), 1);
        assert!(cache.has("real"));
    }

    #[test]
    fn test_identity_less_record_never_reads_cache() {
        let mut cache = MockPropertyCachePort::new();
        cache.expect_get().never();
        cache.expect_set().never();

        let processor = PropertyProcessor::new(
            ImageResolver::new("proj", "production"),
            Arc::new(cache),
            Arc::new(ManualClock::starting_now()),
        );
        let property = processor
            .process(&json!({ "titulo": "Casa" }), OptimizationLevel::Basic)
            .unwrap();

        assert!(property.id.starts_with("prop-"));
        assert!(!property.cache_hit);
    }

    #[test]
    fn test_process_many_drops_bad_records() {
        let Fixture { processor, .. } = fixture();
        let processor = processor.with_batch_size(2);
        let raws = vec![
            json!({ "_id": "a" }),
            json!(null),
            json!({ "_id": "b" }),
            json!(7),
            json!({ "_id": "c" }),
        ];

        let processed = processor.process_many(&raws, OptimizationLevel::Basic);
        let ids: Vec<&str> = processed.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_failure_is_logged_with_id_and_duration() {
        let Fixture { processor, .. } = fixture();

        let logs = capture_logs(|| {
            let _ = processor.process(&json!(42), OptimizationLevel::Basic);
        });

        assert!(logs.contains("ERROR"));
        assert!(logs.contains("Failed to process property"));
        assert!(logs.contains("unknown"));
        assert!(logs.contains("elapsed_ms"));
    }

    #[test]
    fn test_slow_batch_summary_is_logged() {
        let Fixture { processor, .. } = fixture();
        let processor = processor.with_slow_threshold(Duration::ZERO);
        let raws = vec![json!({ "_id": "s1" }), json!(null)];

        let logs = capture_logs(|| {
            processor.process_many(&raws, OptimizationLevel::Basic);
        });

        assert!(logs.contains("Slow property batch processing"));
        assert!(logs.contains("total=2"));
        assert!(logs.contains("dropped=1"));
    }

    #[test]
    fn test_fast_batch_is_not_reported() {
        let Fixture { processor, .. } = fixture();
        let processor = processor.with_slow_threshold(Duration::from_secs(3600));

        let logs = capture_logs(|| {
            processor.process_many(&[json!({ "_id": "f1" })], OptimizationLevel::Basic);
        });

        assert!(!logs.contains("Slow property batch processing"));
    }

    #[test]
    fn test_premium_adds_main_image_variants() {
        let Fixture { processor, .. } = fixture();
        let raw = json!({
            "_id": "v1",
            "imagem": { "asset": { "_ref": "image-abc-800x600-jpg" } },
            "galeria": [
                { "asset": { "_ref": "image-def-800x600-jpg" } },
                { "asset": { "_ref": "not-a-ref" } }
            ]
        });

        let property = processor.process(&raw, OptimizationLevel::Premium).unwrap();

        assert!(property.main_image.responsive().is_some());
        assert_eq!(property.gallery.len(), 1);
        assert!(property.gallery[0].responsive().is_none());
    }

    #[test]
    fn test_custom_placeholder_for_missing_image() {
        let Fixture { processor, .. } = fixture();
        let processor = processor.with_placeholder_url("/img/sem-foto.png");

        let property = processor
            .process(&json!({ "_id": "p1" }), OptimizationLevel::Basic)
            .unwrap();
        assert_eq!(property.main_image.url(), "/img/sem-foto.png");
    }

    #[test]
    fn test_untitled_listing_defaults() {
        let property = process(&json!({ "_id": "u1" }));

        assert_eq!(property.title, DEFAULT_TITLE);
        assert_eq!(property.city, DEFAULT_CITY);
        assert_eq!(property.main_image.alt(), GENERIC_ALT);
        assert_eq!(property.main_image.url(), PLACEHOLDER_URL);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("  Casa -- Verde  "), "casa-verde");
        assert_eq!(slugify("!!!"), "");
    }
}
