use kselect::{
    from_fn, Clusterer, DistortionJump, GapStatistic, KScore, KSelector, MaxSilhouette, Stability,
};
use ndarray::{Array2, ArrayView2};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=kselect=debug shows every candidate k as it is scored.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Three Gaussian blobs, 30 points each.
    let mut rng = StdRng::seed_from_u64(2024);
    let noise = Normal::new(0.0, 0.5)?;
    let centers = [(0.0, 0.0), (6.0, 0.0), (3.0, 5.0)];
    let mut flat = Vec::new();
    for (cx, cy) in centers {
        for _ in 0..30 {
            flat.push(cx + noise.sample(&mut rng));
            flat.push(cy + noise.sample(&mut rng));
        }
    }
    let data = Array2::from_shape_vec((90, 2), flat)?;

    // Farthest-first centers, then one nearest-center pass. Crude, but any
    // procedure with this signature works.
    let clusterer = from_fn(|x, k| Ok(farthest_first(x, k)));

    let stability = Stability::new().with_k_max(6).with_nb_draw(20).with_seed(1);
    let gap = GapStatistic::new().with_k_max(6).with_nb_draw(20).with_seed(1);
    report("stability", stability, data.view(), &clusterer)?;
    report("gap statistic", gap, data.view(), &clusterer)?;
    report("distortion jump", DistortionJump::new().with_k_max(6), data.view(), &clusterer)?;
    report("max silhouette", MaxSilhouette::new().with_k_max(6), data.view(), &clusterer)?;

    Ok(())
}

fn report<S: KSelector, C: Clusterer>(
    name: &str,
    selector: S,
    data: ArrayView2<'_, f64>,
    clusterer: &C,
) -> kselect::Result<()> {
    let curve: Vec<KScore> = selector.scores(data, clusterer)?;
    let k = selector.select_k(data, clusterer)?;
    println!("{name}: k = {k}");
    for s in curve {
        println!("  k={:<2} score={:+.4}", s.k, s.score);
    }
    Ok(())
}

fn farthest_first(data: ArrayView2<'_, f64>, k: usize) -> Vec<usize> {
    let dist = |i: usize, j: usize| -> f64 {
        data.row(i)
            .iter()
            .zip(data.row(j).iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum()
    };

    let mut seeds = vec![0];
    while seeds.len() < k.min(data.nrows()) {
        let next = (0..data.nrows())
            .max_by(|&a, &b| {
                let da = seeds.iter().map(|&s| dist(a, s)).fold(f64::MAX, f64::min);
                let db = seeds.iter().map(|&s| dist(b, s)).fold(f64::MAX, f64::min);
                da.total_cmp(&db)
            })
            .unwrap_or(0);
        seeds.push(next);
    }

    (0..data.nrows())
        .map(|i| {
            (0..seeds.len())
                .min_by(|&a, &b| dist(i, seeds[a]).total_cmp(&dist(i, seeds[b])))
                .unwrap_or(0)
        })
        .collect()
}
