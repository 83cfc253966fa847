use ndarray::Array1;

pub(crate) fn normalize_l2(vec: &mut Array1<f64>) {
    let norm: f64 = vec.iter().map(|&x| x * x).sum::<f64>().sqrt();
    if norm > 1e-12 {
        *vec /= norm;
    }
}

pub(crate) fn normalize_l1(vec: &mut Array1<f64>) {
    let norm: f64 = vec.iter().map(|x| x.abs()).sum();
    if norm > 1e-12 {
        *vec /= norm;
    }
}

pub(crate) fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}
