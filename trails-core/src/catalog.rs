//! The fixed catalog of dog parks around Parramatta.
//!
//! Parks are compile-time constants; nothing creates, updates or deletes them at
//! runtime. `slug` is the routing key and is unique across the catalog.

use serde::Serialize;

use crate::model::Coordinates;
use facilities::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Facility {
    pub name: &'static str,
    pub icon: &'static str,
    pub description: Option<&'static str>,
}

impl Facility {
    const fn new(name: &'static str, icon: &'static str, description: &'static str) -> Self {
        Self {
            name,
            icon,
            description: Some(description),
        }
    }
}

/// Well-known facilities shared by the catalog entries.
pub mod facilities {
    use super::Facility;

    pub const OFF_LEASH: Facility = Facility::new(
        "Off-leash area",
        "square",
        "Designated area where dogs can run without a leash",
    );
    pub const FENCED: Facility = Facility::new(
        "Fully fenced",
        "square",
        "Secure fencing around the entire off-leash area",
    );
    pub const WATER_FOUNTAIN: Facility = Facility::new(
        "Water fountains",
        "droplet",
        "Fresh water available for dogs and owners",
    );
    pub const DOG_WATER: Facility = Facility::new(
        "Dog water station",
        "droplet",
        "Dedicated water stations for dogs",
    );
    pub const SEATING: Facility = Facility::new(
        "Seating areas",
        "armchair",
        "Benches and seating for owners",
    );
    pub const SHADE: Facility = Facility::new(
        "Shaded areas",
        "umbrella",
        "Trees or structures providing shade",
    );
    pub const PARKING: Facility =
        Facility::new("Parking", "car", "Dedicated parking spaces available");
    pub const TOILETS: Facility = Facility::new("Toilets", "bath", "Public restrooms on site");
    pub const CAFE: Facility = Facility::new(
        "Cafe nearby",
        "coffee",
        "Coffee or food available close to the park",
    );
    pub const PLAYGROUND: Facility =
        Facility::new("Playground", "toy", "Children's play equipment");
    pub const AGILITY: Facility = Facility::new(
        "Agility equipment",
        "activity",
        "Dog agility or exercise equipment",
    );
    pub const WASTE_BAGS: Facility =
        Facility::new("Waste bags", "trash", "Dog waste bag dispensers available");
    pub const PICNIC: Facility =
        Facility::new("Picnic areas", "utensils", "Tables and spaces for picnics");
    pub const BBQ: Facility =
        Facility::new("BBQ facilities", "flame", "Public BBQ equipment available");
    pub const BEACH: Facility =
        Facility::new("Beach access", "waves", "Access to dog-friendly beach area");
    pub const SWIM_AREA: Facility =
        Facility::new("Swimming area", "swim", "Safe water area for dogs to swim");
    pub const WALKING_TRAILS: Facility =
        Facility::new("Walking trails", "footprints", "Designated walking paths");
    pub const LIGHTING: Facility =
        Facility::new("Night lighting", "lamp", "Illumination for evening visits");
    pub const SMALL_DOG_AREA: Facility =
        Facility::new("Small dog area", "dog", "Separate area for small breeds");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParkRules {
    pub off_leash_areas: bool,
    pub off_leash_hours: Option<&'static str>,
    pub dog_water_access: bool,
    pub bag_dispenser_available: bool,
    pub size_restrictions: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Accessibility {
    pub parking: bool,
    pub public_transport: bool,
    pub wheelchair_accessible: bool,
    pub nearby_amenities: &'static [&'static str],
}

/// Busyness per period, 1 (quiet) to 5 (packed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PopularTimes {
    pub morning: u8,
    pub afternoon: u8,
    pub evening: u8,
    pub weekend: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Park {
    pub id: u32,
    pub name: &'static str,
    pub slug: &'static str,
    pub location: &'static str,
    pub coordinates: Coordinates,
    pub rating: f64,
    pub reviews: u32,
    pub image: &'static str,
    pub facilities: &'static [Facility],
    pub rules: ParkRules,
    pub accessibility: Accessibility,
    pub description: &'static str,
    pub long_description: Option<&'static str>,
    /// Free text such as `"2.3 km"`; only the leading number is ever interpreted.
    pub distance: Option<&'static str>,
    pub address: &'static str,
    pub hours: &'static str,
    pub phone: Option<&'static str>,
    pub website: Option<&'static str>,
    pub size: &'static str,
    pub terrain: &'static [&'static str],
    pub popular_times: Option<PopularTimes>,
    pub best_for: &'static [&'static str],
}

impl Park {
    pub fn has_facility(&self, name: &str) -> bool {
        self.facilities.iter().any(|f| f.name == name)
    }
}


static PARKS: [Park; 5] = [
    Park {
        id: 1,
        name: "Parramatta Park",
        slug: "parramatta-park",
        location: "Parramatta, NSW",
        coordinates: Coordinates::new(-33.815, 151.0017),
        rating: 4.7,
        reviews: 892,
        image: "/placeholder.svg?height=400&width=600&text=Parramatta+Park",
        facilities: &[
            OFF_LEASH,
            WATER_FOUNTAIN,
            SEATING,
            SHADE,
            PARKING,
            TOILETS,
            CAFE,
            WASTE_BAGS,
            PICNIC,
            WALKING_TRAILS,
            PLAYGROUND,
        ],
        rules: ParkRules {
            off_leash_areas: true,
            off_leash_hours: Some("All hours in designated areas"),
            dog_water_access: true,
            bag_dispenser_available: true,
            size_restrictions: None,
        },
        accessibility: Accessibility {
            parking: true,
            public_transport: true,
            wheelchair_accessible: true,
            nearby_amenities: &["Cafes", "Restaurants", "Parramatta CBD"],
        },
        description: "Historic park with extensive off-leash areas and beautiful river views.",
        long_description: Some(
            "Parramatta Park is a 85-hectare heritage-listed park offering multiple off-leash \
             areas for dogs. The park features the Domain Creek off-leash area and several other \
             designated zones where dogs can run freely. With its rich history dating back to \
             1858, the park combines heritage buildings with modern facilities. The Parramatta \
             River runs through the park, providing scenic walking trails and water access for \
             dogs.",
        ),
        distance: Some("1.2 km"),
        address: "Pitt Street, Parramatta, NSW 2150",
        hours: "Open 24 hours",
        phone: Some("(02) 9895 7777"),
        website: Some("https://www.parramattapark.com.au/"),
        size: "85 hectares (210 acres)",
        terrain: &["Open fields", "River frontage", "Heritage gardens", "Walking paths"],
        popular_times: Some(PopularTimes {
            morning: 5,
            afternoon: 4,
            evening: 4,
            weekend: 5,
        }),
        best_for: &["Historic walks", "River access", "Large dogs", "Training"],
    },
    Park {
        id: 2,
        name: "Lake Parramatta Reserve",
        slug: "lake-parramatta-reserve",
        location: "North Parramatta, NSW",
        coordinates: Coordinates::new(-33.7889, 151.0167),
        rating: 4.6,
        reviews: 654,
        image: "/placeholder.svg?height=400&width=600&text=Lake+Parramatta",
        facilities: &[
            OFF_LEASH,
            WATER_FOUNTAIN,
            SEATING,
            SHADE,
            PARKING,
            TOILETS,
            WASTE_BAGS,
            WALKING_TRAILS,
            PICNIC,
            BBQ,
        ],
        rules: ParkRules {
            off_leash_areas: true,
            off_leash_hours: Some("Before 9am and after 4pm"),
            dog_water_access: true,
            bag_dispenser_available: true,
            size_restrictions: None,
        },
        accessibility: Accessibility {
            parking: true,
            public_transport: false,
            wheelchair_accessible: true,
            nearby_amenities: &["Kiosk", "Picnic areas"],
        },
        description: "Scenic lake reserve with bushland trails and designated off-leash times.",
        long_description: Some(
            "Lake Parramatta Reserve offers a peaceful bushland setting around a beautiful lake. \
             The reserve features designated off-leash hours where dogs can explore the natural \
             environment safely. Multiple walking trails of varying difficulty wind through native \
             bushland, providing excellent exercise for both dogs and owners. The lake area offers \
             water access for dogs during off-leash times, and the reserve includes several picnic \
             areas perfect for family outings.",
        ),
        distance: Some("3.8 km"),
        address: "Lake Parramatta Road, North Parramatta, NSW 2151",
        hours: "6:00 AM - 6:00 PM",
        phone: Some("(02) 9806 5050"),
        website: None,
        size: "70 hectares (173 acres)",
        terrain: &["Lake", "Bushland trails", "Open areas", "Natural paths"],
        popular_times: Some(PopularTimes {
            morning: 5,
            afternoon: 3,
            evening: 4,
            weekend: 5,
        }),
        best_for: &["Nature walks", "Swimming dogs", "Bushland exploration", "Quiet exercise"],
    },
    Park {
        id: 3,
        name: "Granville Park",
        slug: "granville-park",
        location: "Granville, NSW",
        coordinates: Coordinates::new(-33.8317, 151.0139),
        rating: 4.4,
        reviews: 423,
        image: "/placeholder.svg?height=400&width=600&text=Granville+Park",
        facilities: &[
            OFF_LEASH,
            FENCED,
            WATER_FOUNTAIN,
            DOG_WATER,
            SEATING,
            SHADE,
            PARKING,
            WASTE_BAGS,
            AGILITY,
            SMALL_DOG_AREA,
        ],
        rules: ParkRules {
            off_leash_areas: true,
            off_leash_hours: Some("All hours"),
            dog_water_access: true,
            bag_dispenser_available: true,
            size_restrictions: None,
        },
        accessibility: Accessibility {
            parking: true,
            public_transport: true,
            wheelchair_accessible: true,
            nearby_amenities: &["Shops", "Train station"],
        },
        description: "Fully fenced dog park with separate areas for small and large dogs.",
        long_description: Some(
            "Granville Park features a purpose-built, fully fenced off-leash dog area that's \
             perfect for safe, supervised play. The park includes separate sections for small and \
             large dogs, ensuring comfortable play for all sizes. Agility equipment is available \
             for active dogs, and multiple water stations keep pets hydrated. The park's central \
             location near Granville train station makes it easily accessible, and ample parking \
             is available for those driving.",
        ),
        distance: Some("2.1 km"),
        address: "Carlton Street, Granville, NSW 2142",
        hours: "6:00 AM - 8:00 PM",
        phone: Some("(02) 9895 0777"),
        website: None,
        size: "2 hectares (5 acres)",
        terrain: &["Fenced areas", "Grass surface", "Agility course"],
        popular_times: Some(PopularTimes {
            morning: 4,
            afternoon: 5,
            evening: 4,
            weekend: 5,
        }),
        best_for: &["Small dogs", "Nervous dogs", "Agility training", "Safe play"],
    },
    Park {
        id: 4,
        name: "Merrylands Park",
        slug: "merrylands-park",
        location: "Merrylands, NSW",
        coordinates: Coordinates::new(-33.8372, 150.9889),
        rating: 4.5,
        reviews: 567,
        image: "/placeholder.svg?height=400&width=600&text=Merrylands+Park",
        facilities: &[
            OFF_LEASH,
            WATER_FOUNTAIN,
            SEATING,
            SHADE,
            PARKING,
            TOILETS,
            WASTE_BAGS,
            PICNIC,
            PLAYGROUND,
            WALKING_TRAILS,
        ],
        rules: ParkRules {
            off_leash_areas: true,
            off_leash_hours: Some("All hours in designated areas"),
            dog_water_access: true,
            bag_dispenser_available: true,
            size_restrictions: None,
        },
        accessibility: Accessibility {
            parking: true,
            public_transport: true,
            wheelchair_accessible: true,
            nearby_amenities: &["Shopping center", "Cafes", "Library"],
        },
        description: "Community park with large off-leash area and excellent family facilities.",
        long_description: Some(
            "Merrylands Park is a well-maintained community space featuring a large designated \
             off-leash area where dogs can exercise freely. The park combines recreational \
             facilities for families with excellent amenities for dog owners. Multiple walking \
             paths wind through the park, and the adjacent playground makes it perfect for \
             families with children and pets. The park's location near Merrylands shopping center \
             provides convenient access to cafes and shops.",
        ),
        distance: Some("4.2 km"),
        address: "Burnett Street, Merrylands, NSW 2160",
        hours: "Open 24 hours",
        phone: Some("(02) 9840 9840"),
        website: None,
        size: "12 hectares (30 acres)",
        terrain: &["Open fields", "Paved paths", "Grassy areas", "Playground area"],
        popular_times: Some(PopularTimes {
            morning: 4,
            afternoon: 4,
            evening: 3,
            weekend: 5,
        }),
        best_for: &["Family outings", "Community events", "Regular exercise", "Social dogs"],
    },
    Park {
        id: 5,
        name: "Westmead Park",
        slug: "westmead-park",
        location: "Westmead, NSW",
        coordinates: Coordinates::new(-33.8067, 150.9878),
        rating: 4.3,
        reviews: 389,
        image: "/placeholder.svg?height=400&width=600&text=Westmead+Park",
        facilities: &[
            OFF_LEASH,
            WATER_FOUNTAIN,
            SEATING,
            SHADE,
            PARKING,
            TOILETS,
            WASTE_BAGS,
            WALKING_TRAILS,
            LIGHTING,
        ],
        rules: ParkRules {
            off_leash_areas: true,
            off_leash_hours: Some("6:00 AM - 8:00 PM"),
            dog_water_access: true,
            bag_dispenser_available: true,
            size_restrictions: None,
        },
        accessibility: Accessibility {
            parking: true,
            public_transport: true,
            wheelchair_accessible: true,
            nearby_amenities: &["Hospital", "Medical precinct", "Cafes"],
        },
        description: "Well-lit park with evening access and proximity to Westmead medical \
                      precinct.",
        long_description: Some(
            "Westmead Park offers a convenient location near the major medical precinct with \
             excellent lighting for evening visits. The park features a designated off-leash area \
             that's well-maintained and regularly patrolled. Walking trails connect to the broader \
             Westmead area, and the park's lighting system allows for safe evening exercise. The \
             proximity to Westmead Hospital and the medical precinct makes it popular with \
             healthcare workers and local residents.",
        ),
        distance: Some("5.1 km"),
        address: "Hawkesbury Road, Westmead, NSW 2145",
        hours: "6:00 AM - 10:00 PM",
        phone: Some("(02) 9845 3333"),
        website: None,
        size: "8 hectares (20 acres)",
        terrain: &["Open areas", "Paved paths", "Landscaped gardens", "Lit walkways"],
        popular_times: Some(PopularTimes {
            morning: 3,
            afternoon: 4,
            evening: 5,
            weekend: 4,
        }),
        best_for: &[
            "Evening walks",
            "Medical precinct workers",
            "Well-lit exercise",
            "Regular visits",
        ],
    },
];

/// Every park, in catalog order.
pub fn all() -> &'static [Park] {
    &PARKS
}

pub fn find_by_slug(slug: &str) -> Option<&'static Park> {
    PARKS.iter().find(|p| p.slug == slug)
}

pub fn find_by_id(id: u32) -> Option<&'static Park> {
    PARKS.iter().find(|p| p.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn slugs_are_unique_and_url_safe() {
        let mut seen = HashSet::new();
        for park in all() {
            assert!(seen.insert(park.slug), "duplicate slug {}", park.slug);
            assert!(
                park.slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
                "slug {} is not url safe",
                park.slug
            );
        }
    }

    #[test]
    fn ids_are_unique() {
        let ids: HashSet<u32> = all().iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), all().len());
    }

    #[test]
    fn lookup_by_slug_and_id() {
        let park = find_by_slug("granville-park").expect("granville park exists");
        assert_eq!(park.id, 3);
        assert_eq!(find_by_id(3).map(|p| p.slug), Some("granville-park"));
        assert!(find_by_slug("hyde-park").is_none());
        assert!(find_by_id(42).is_none());
    }

    #[test]
    fn ratings_and_popular_times_are_in_range() {
        for park in all() {
            assert!((0.0..=5.0).contains(&park.rating));
            if let Some(times) = park.popular_times {
                for level in [times.morning, times.afternoon, times.evening, times.weekend] {
                    assert!((1..=5).contains(&level));
                }
            }
        }
    }

    #[test]
    fn only_granville_is_fully_fenced() {
        let fenced: Vec<_> =
            all().iter().filter(|p| p.has_facility(FENCED.name)).map(|p| p.slug).collect();
        assert_eq!(fenced, vec!["granville-park"]);
    }
}
