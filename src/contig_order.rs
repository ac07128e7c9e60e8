
use std::cmp::Ordering;

/// Literal prefix that is ignored when comparing contig names
const CONTIG_PREFIX: &str = "chr";

/// Non-numeric contigs that always sort ahead of the other non-numeric contigs, in this order.
/// Do not extend this list without re-checking the early return in `chrom_cmp`, it only yields a total order for these entries.
const PRIORITY_CONTIGS: [&str; 4] = ["X", "Y", "M", "MT"];

/// Compares two contig names such that numeric contigs come first (in numeric order), then X, Y, M, MT, then everything else lexicographically.
/// A leading "chr" is ignored, so "chr2" < "chr10" and "2" < "10".
/// Names that only differ in the "chr" prefix (or leading zeroes) are ordered by their raw string to keep the order total.
/// # Arguments
/// * `x` - the first contig name
/// * `y` - the second contig name
pub fn chrom_cmp(x: &str, y: &str) -> Ordering {
    if x == y {
        return Ordering::Equal;
    }

    let stripped_x = x.strip_prefix(CONTIG_PREFIX).unwrap_or(x);
    let stripped_y = y.strip_prefix(CONTIG_PREFIX).unwrap_or(y);
    if stripped_x == stripped_y {
        // e.g. "chrX" and "X"
        return x.cmp(y);
    }

    match (parse_contig_number(stripped_x), parse_contig_number(stripped_y)) {
        (Some(nx), Some(ny)) => nx.cmp(&ny).then_with(|| x.cmp(y)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => {
            // first one to hit the current list entry wins
            for &priority in PRIORITY_CONTIGS.iter() {
                if stripped_x == priority {
                    return Ordering::Less;
                } else if stripped_y == priority {
                    return Ordering::Greater;
                }
            }
            stripped_x.cmp(stripped_y)
        }
    }
}

/// Sorts a set of contig names in place using `chrom_cmp`.
/// # Arguments
/// * `contigs` - the contig names to sort
pub fn sort_contigs<S: AsRef<str>>(contigs: &mut [S]) {
    contigs.sort_by(|a, b| chrom_cmp(a.as_ref(), b.as_ref()));
}

/// Returns the contig as an integer if the whole name is one
fn parse_contig_number(name: &str) -> Option<i64> {
    name.parse::<i64>().ok()
}
