//! Overpass QL query construction.

use crate::region::Region;

/// Road classes selected by the query.
pub const ROAD_CLASSES: [&str; 2] = ["tertiary", "unclassified"];

/// Build the query for one region.
///
/// The region is resolved as an admin_level 4 boundary relation whose `name`
/// matches the region's search pattern. Within it, ways of each road class
/// are selected both with and without a `smoothness` tag so assessed roads
/// come first in the result.
pub fn build_region_query(region: &Region, server_timeout_secs: u64, max_size: u64) -> String {
    let mut selectors = String::new();
    for filter in ["[\"smoothness\"]", "[!\"smoothness\"]"] {
        for class in ROAD_CLASSES {
            selectors.push_str(&format!(
                "  way[\"highway\"=\"{}\"]{}(area.region_area);\n",
                class, filter
            ));
        }
    }

    format!(
        "[out:json][timeout:{}][maxsize:{}];\n\
         rel[\"boundary\"=\"administrative\"][\"admin_level\"=\"4\"][\"name\"~\"{}\"];\n\
         map_to_area->.region_area;\n\
         (\n{});\n\
         out geom;",
        server_timeout_secs,
        max_size,
        escape_pattern(region.search_pattern),
        selectors
    )
}

fn escape_pattern(pattern: &str) -> String {
    pattern.replace('\\', "\\\\").replace('"', "\\\"")
}
