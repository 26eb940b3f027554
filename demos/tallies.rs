use exarg::{count_map, AutoMap, DepthMap};

fn main() {
    // Fixed depth: chromosome -> position -> observation count.
    let mut per_position: DepthMap<String, i64> = DepthMap::new(2).unwrap();

    for (chromosome, position) in [("chr1", "100"), ("chr1", "100"), ("chr2", "7")] {
        *per_position.tally(&[chromosome.to_string(), position.to_string()]) += 1;
    }

    let observed = per_position
        .get(&["chr1".to_string(), "100".to_string()])
        .unwrap();
    println!("chr1:100 observed {observed} times");

    // Single depth: plain tallying.
    let mut counts = count_map::<String>();
    *counts.tally(&["hits".to_string()]) += 3;
    println!("hits: {}", counts.get(&["hits".to_string()]).unwrap());

    // Unbounded depth: grouping without declaring the nesting up front.
    let mut groups: AutoMap<String> = AutoMap::default();
    groups.dive(["sample", "lane", "tile"].map(String::from));
    groups.dive(["sample", "lane", "cycle"].map(String::from));
    println!("{} top-level groups", groups.len());
}
