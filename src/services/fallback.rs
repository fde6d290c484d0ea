// src/services/fallback.rs
// DOCUMENTATION: Synthetic listing generation
// PURPOSE: Produce plausible listings when the places provider has no data

use rand::Rng;

use crate::models::{
    Category, Coordinates, ServiceListing, GENERIC_PROVIDER_NAME, PRICE_VARIES,
    SYNTHETIC_ID_PREFIX,
};

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_LENGTH: usize = 9;

/// Positional jitter in degrees per synthesized kilometer
const JITTER_DEGREES_PER_KM: f64 = 0.005;

/// One-decimal rating string in [3.5, 5.0]
pub fn synthesize_rating<R: Rng>(rng: &mut R) -> String {
    format!("{:.1}", rng.random_range(3.5..=5.0_f64))
}

/// Review count in [50, 250)
pub fn synthesize_review_count<R: Rng>(rng: &mut R) -> u32 {
    rng.random_range(50..250)
}

/// Opaque identifier marked as synthetic, e.g. "mock-k3j9x0a1b"
pub fn synthetic_id<R: Rng>(rng: &mut R) -> String {
    let suffix: String = (0..ID_LENGTH)
        .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("{}{}", SYNTHETIC_ID_PREFIX, suffix)
}

/// North American style phone number with random digit groups
fn synthesize_contact<R: Rng>(rng: &mut R) -> String {
    format!(
        "+1 {}-{}-{}",
        rng.random_range(100..1000),
        rng.random_range(100..1000),
        rng.random_range(1000..10000)
    )
}

/// Pick the i-th provider name, numbering repeats once the pool runs out
fn provider_name(category: Option<Category>, index: usize) -> String {
    let pool: &[&str] = match category {
        Some(category) => category.mock_names(),
        None => &[GENERIC_PROVIDER_NAME],
    };

    let base = pool[index % pool.len()];
    if index >= pool.len() {
        format!("{} {}", base, index / pool.len() + 1)
    } else {
        base.to_string()
    }
}

/// Fallback listing generator
/// DOCUMENTATION: Stateless; the random source is supplied by the caller
/// so results can be reproduced with a seeded generator.
pub struct FallbackGenerator;

impl FallbackGenerator {
    /// Generate `count` synthetic listings around `origin`
    ///
    /// Each listing gets a distance in [0.5, 5.5) km and a position jittered
    /// around the origin in proportion to that distance, so markers farther
    /// "away" also land farther out on the map.
    pub fn generate<R: Rng>(
        rng: &mut R,
        origin: Coordinates,
        category: Option<Category>,
        count: usize,
    ) -> Vec<ServiceListing> {
        (0..count)
            .map(|i| {
                let distance_km = rng.random_range(0.5..5.5_f64);
                let spread = distance_km * JITTER_DEGREES_PER_KM;
                let latitude = origin.latitude + (rng.random::<f64>() - 0.5) * spread;
                let longitude = origin.longitude + (rng.random::<f64>() - 0.5) * spread;

                ServiceListing {
                    id: synthetic_id(rng),
                    name: provider_name(category, i),
                    location: format!("{:.1} km from your location", distance_km),
                    rating: synthesize_rating(rng),
                    reviews: synthesize_review_count(rng),
                    price: PRICE_VARIES.to_string(),
                    distance: format!("{:.1} km", distance_km),
                    contacts: synthesize_contact(rng),
                    position: Some(Coordinates::new(latitude, longitude)),
                    synthetic: true,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn origin() -> Coordinates {
        Coordinates::new(40.7128, -74.0060)
    }

    fn parse_km(label: &str) -> f64 {
        label.trim_end_matches(" km").parse().unwrap()
    }

    #[test]
    fn test_generates_requested_count() {
        let mut rng = StdRng::seed_from_u64(7);
        let listings =
            FallbackGenerator::generate(&mut rng, origin(), Some(Category::AirConditioning), 5);

        assert_eq!(listings.len(), 5);
        assert!(listings.iter().all(|l| l.synthetic));
        assert!(listings.iter().all(|l| l.id.starts_with(SYNTHETIC_ID_PREFIX)));
        assert!(listings.iter().all(|l| l.price == "Varies"));
    }

    #[test]
    fn test_names_cycle_with_suffix() {
        let mut rng = StdRng::seed_from_u64(1);
        let listings =
            FallbackGenerator::generate(&mut rng, origin(), Some(Category::AirConditioning), 7);
        let names: Vec<&str> = listings.iter().map(|l| l.name.as_str()).collect();

        assert_eq!(
            names,
            vec![
                "CoolAir Technicians",
                "Freeze Fix Pro",
                "Climate Control Experts",
                "CoolAir Technicians 2",
                "Freeze Fix Pro 2",
                "Climate Control Experts 2",
                "CoolAir Technicians 3",
            ]
        );
    }

    #[test]
    fn test_no_category_uses_generic_name() {
        let mut rng = StdRng::seed_from_u64(2);
        let listings = FallbackGenerator::generate(&mut rng, origin(), None, 2);

        assert_eq!(listings[0].name, "Home Appliance Repair");
        assert_eq!(listings[1].name, "Home Appliance Repair 2");
    }

    #[test]
    fn test_synthesized_fields_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let listings =
            FallbackGenerator::generate(&mut rng, origin(), Some(Category::Microwave), 200);

        for listing in &listings {
            let rating: f64 = listing.rating.parse().unwrap();
            assert!((3.5..=5.0).contains(&rating), "rating {}", rating);
            assert!((50..250).contains(&listing.reviews));

            let km = parse_km(&listing.distance);
            // one-decimal rounding can land on 5.5
            assert!((0.5..=5.5).contains(&km), "distance {}", km);
            assert_eq!(listing.location, format!("{} from your location", listing.distance));

            let position = listing.position.unwrap();
            let max_offset = 5.5 * JITTER_DEGREES_PER_KM / 2.0;
            assert!((position.latitude - origin().latitude).abs() <= max_offset);
            assert!((position.longitude - origin().longitude).abs() <= max_offset);
        }
    }

    #[test]
    fn test_contact_format() {
        let mut rng = StdRng::seed_from_u64(3);
        let contact = synthesize_contact(&mut rng);
        let digits: Vec<&str> = contact.trim_start_matches("+1 ").split('-').collect();

        assert!(contact.starts_with("+1 "));
        assert_eq!(digits.len(), 3);
        assert_eq!(digits[0].len(), 3);
        assert_eq!(digits[1].len(), 3);
        assert_eq!(digits[2].len(), 4);
    }

    #[test]
    fn test_synthetic_id_shape() {
        let mut rng = StdRng::seed_from_u64(9);
        let id = synthetic_id(&mut rng);
        let suffix = id.trim_start_matches(SYNTHETIC_ID_PREFIX);

        assert_eq!(suffix.len(), ID_LENGTH);
        assert!(suffix.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }
}
