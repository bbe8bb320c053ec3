//! Examples of using the integer map
use intmap_immutable::IntMap;

fn main() {
    // Create a new map
    let map = IntMap::new();

    // Insert some values; every version stays usable
    let v1 = map.insert(5, "a");
    let v2 = v1.insert(9, "b").insert(1, "c");

    assert_eq!(v1.len(), 1);
    assert_eq!(v2.get(5), Some(&"a"));
    assert_eq!(v2.get(7), None);

    // Merge two maps; the right-hand side wins on collisions
    let patch = IntMap::new().insert(9, "z");
    let merged = v2.merge(&patch);
    assert_eq!(merged.get(9), Some(&"z"));
    assert_eq!(merged.get(1), Some(&"c"));

    // Combine colliding values instead
    let counts = IntMap::new().insert(1, 2).insert(2, 1);
    let more = IntMap::new().insert(2, 4).insert(3, 1);
    let total = counts.merge_with(&more, |_, a, b| a + b);
    assert_eq!(total.get(2), Some(&5));

    // Remove a key
    let smaller = merged.remove(5);
    assert_eq!(smaller.get(5), None);
    assert_eq!(merged.get(5), Some(&"a"));

    // Iterate in ascending key order
    for (key, value) in &merged {
        println!("{} => {}", key, value);
    }
}
