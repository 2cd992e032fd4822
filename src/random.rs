use rand::Rng;

use crate::model::{Cluster, Domain, Orf, Strand};

/// Generate a random cluster for demos and tests: 5-20 ORFs spread over a
/// 5-50 kb span, each carrying up to three randomly colored domains. The
/// records always satisfy the model invariants, so they lay out cleanly at
/// any height.
pub fn random_cluster<R: Rng>(rng: &mut R) -> Cluster {
    let cl_start: i64 = 23_000;
    let cl_end = cl_start + rng.random_range(5_000..50_000i64);
    let span = cl_end - cl_start;

    let num_orfs = rng.random_range(5..20i64);
    let segment = span / num_orfs;
    let mut orfs = Vec::new();
    for i in 0..num_orfs {
        let pos1 = rng.random_range(i * segment..(i + 1) * segment);
        let pos2 = rng.random_range(i * segment..(i + 1) * segment);
        if (pos1 - pos2).abs() < 200 {
            continue;
        }
        let start = cl_start + pos1.min(pos2);
        let end = cl_start + pos1.max(pos2);
        let len = end - start;
        let strand = if rng.random_bool(0.5) {
            Strand::Forward
        } else {
            Strand::Reverse
        };

        let num_domains = rng.random_range(0..4i64);
        let mut domains = Vec::new();
        for j in 0..num_domains {
            let sub = len / num_domains;
            let dpos1 = rng.random_range(j * sub..(j + 1) * sub);
            let dpos2 = rng.random_range(j * sub..(j + 1) * sub);
            // Domain coordinates are amino acids local to the ORF.
            domains.push(Domain {
                code: format!("RAND_DOM_{i}_{j}"),
                start: dpos1.min(dpos2) / 3,
                end: dpos1.max(dpos2) / 3,
                bitscore: rng.random_range(30..300) as f64,
                color: Some(format!(
                    "rgb({},{},{})",
                    rng.random_range(0..256),
                    rng.random_range(0..256),
                    rng.random_range(0..256)
                )),
            });
        }

        orfs.push(Orf {
            id: format!("RAND_ORF_{i}"),
            start,
            end,
            strand,
            domains,
            color: None,
            desc: Some("Randomly generated ORF".to_string()),
        });
    }

    Cluster {
        start: cl_start,
        end: cl_end,
        orfs,
        desc: Some("Randomly generated Cluster".to_string()),
        id: None,
    }
}
