//! LaTeX reference formulas for each metric of each model.
//!
//! Display-math strings are wrapped in `$$…$$` and are meant for a MathJax
//! or KaTeX renderer. They describe what the model computes; the engine
//! itself works in the log domain where the closed forms would overflow.

use crate::models::ModelKind;
use crate::result::Metric;

/// Returned when a metric has no formula for a model.
pub const NOT_AVAILABLE: &str = "Formula not available.";

/// Formula body (without delimiters) for `metric` under `kind`.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn latex(metric: Metric, kind: ModelKind) -> &'static str {
    use Metric as M;
    use ModelKind as K;

    match (metric, kind) {
        (M::P0, K::Mm1Inf) => r"p_0 = 1 - \rho,\; \rho = \lambda/\mu < 1",
        (M::P0, K::Mm1N) => r"p_0 = \frac{1-\rho}{1-\rho^{N+1}},\; \rho=\lambda/\mu",
        (M::P0, K::MmcInf) => {
            r"p_0 = \left[\sum_{n=0}^{c-1} \frac{(\lambda/\mu)^n}{n!} + \frac{(\lambda/\mu)^c}{c!(1-\rho)}\right]^{-1},\; \rho=\lambda/(c\mu)"
        }
        (M::P0, K::MmcN) => {
            r"p_0 = \left[\sum_{n=0}^{c-1} \frac{(\lambda/\mu)^n}{n!} + \frac{(\lambda/\mu)^c (1-(\frac{\lambda}{c\mu})^{N-c+1})}{c!(1-\frac{\lambda}{c\mu})}\right]^{-1}"
        }
        (M::P0, K::Mminf) => r"p_0 = e^{-\lambda/\mu}",
        (M::P0, K::MmrRepair) => {
            r"p_0 = \left[ \sum_{n=0}^{R} \binom{K}{n}\rho^n + \sum_{n=R+1}^{K} \binom{K}{n} \frac{n!}{R!R^{n-R}} \rho^n \right]^{-1},\; \rho=\lambda/\mu"
        }
        (M::P0, K::Mg1Pk) => r"p_0 = 1-\rho,\; \rho = \lambda E\{t\}",

        (M::PCapacity, K::Mm1Inf) => r"p_n = p_0 \rho^n,\; \rho = \lambda/\mu",
        (M::PCapacity, K::Mm1N) => r"p_N = p_0 \rho^N",
        (M::PCapacity, K::MmcInf) => {
            r"p_n = \begin{cases} \frac{(\lambda/\mu)^n}{n!} p_0, & n \le c \\ \frac{(\lambda/\mu)^n}{c! c^{n-c}} p_0, & n > c \end{cases}"
        }
        (M::PCapacity, K::MmcN) => {
            r"p_n = \begin{cases} \frac{(\lambda/\mu)^n}{n!} p_0, & n \le c \\ \frac{(\lambda/\mu)^n}{c! c^{n-c}} p_0, & N \ge n > c \end{cases}"
        }
        (M::PCapacity, K::Mminf) => r"p_n = \frac{(\lambda/\mu)^n}{n!} e^{-\lambda/\mu}",
        (M::PCapacity, K::MmrRepair) => {
            r"p_n = \begin{cases} \binom{K}{n} \rho^n p_0, & 0 \le n \le R \\ \binom{K}{n} \frac{n!}{R! R^{n-R}} \rho^n p_0, & R < n \le K \end{cases},\; \rho = \lambda/\mu"
        }
        (M::PCapacity, K::Mg1Pk) => {
            r"p_n \approx (\lambda E\{t\})^n (1 - \lambda E\{t\}),\; n = 0,1,2,\ldots"
        }

        (M::LambdaEff, K::Mm1N | K::MmcN) => r"\lambda_{eff} = \lambda (1 - p_N)",
        (M::LambdaEff, K::MmrRepair) => r"\lambda_{eff} = \lambda (K - L_s)",
        (M::LambdaEff, _) => r"\lambda_{eff} = \lambda",

        (M::LambdaLost, K::Mm1N | K::MmcN) => r"\lambda_{lost} = \lambda p_N",
        (M::LambdaLost, _) => r"\lambda_{lost} = 0",

        (M::Ls, K::Mm1Inf) => r"L_s = \frac{\rho}{1-\rho}",
        (M::Ls, K::Mm1N) => {
            r"L_s = \frac{\rho (1 - (N+1)\rho^N + N \rho^{N+1})}{(1-\rho)(1-\rho^{N+1})}"
        }
        (M::Ls, K::MmcInf) => r"L_s = L_q + \frac{\lambda}{\mu}",
        (M::Ls, K::MmcN) => r"L_s = \sum_{n=0}^{N} n p_n",
        (M::Ls, K::Mminf) => r"L_s = \lambda/\mu",
        (M::Ls, K::MmrRepair) => r"L_s = \sum_{n=0}^{K} n p_n",
        (M::Ls, K::Mg1Pk) => {
            r"L_s = \lambda E\{t\} + \frac{\lambda^2(E\{t\}^2 + Var\{t\})}{2(1-\lambda E\{t\})}"
        }

        (M::Lq, K::Mm1Inf) => r"L_q = \frac{\rho^2}{1-\rho}",
        (M::Lq, K::Mm1N) => r"L_q = L_s - (1 - p_0)",
        (M::Lq, K::MmcInf) => {
            r"L_q = \frac{\lambda^{c+1}}{(c - \lambda/\mu)^2 (c-1)! \mu^{c+1}} p_0"
        }
        (M::Lq, K::MmcN) => r"L_q = \sum_{n=c+1}^{N} (n-c) p_n",
        (M::Lq, K::Mminf) => r"L_q = 0",
        (M::Lq, K::MmrRepair) => r"L_q = \sum_{n=R+1}^{K} (n-R) p_n",
        (M::Lq, K::Mg1Pk) => r"L_q = \frac{\lambda^2 Var\{t\} + \rho^2}{2(1-\rho)}",

        (M::Ws, K::Mm1Inf) => r"W_s = \frac{1}{\mu - \lambda}",
        (M::Ws, K::Mm1N | K::MmcN) => r"W_s = \frac{L_s}{\lambda(1-p_N)}",
        (M::Ws, K::MmcInf) => r"W_s = W_q + \frac{1}{\mu}",
        (M::Ws, K::Mminf) => r"W_s = 1/\mu",
        (M::Ws, K::MmrRepair) => r"W_s = \frac{L_s}{\lambda(K-L_s)}",
        (M::Ws, K::Mg1Pk) => r"W_s = W_q + E\{t\}",

        (M::Wq, K::Mm1Inf) => r"W_q = \frac{\lambda}{\mu(\mu-\lambda)}",
        (M::Wq, K::Mm1N | K::MmcN) => r"W_q = \frac{L_q}{\lambda(1-p_N)}",
        (M::Wq, K::MmcInf | K::Mg1Pk) => r"W_q = L_q / \lambda",
        (M::Wq, K::Mminf) => r"W_q = 0",
        (M::Wq, K::MmrRepair) => r"W_q = \frac{L_q}{\lambda(K-L_s)}",

        (M::CBar, K::Mm1Inf | K::Mg1Pk) => r"\bar{c} = \rho",
        (M::CBar, K::Mm1N) => r"\bar{c} = 1 - p_0",
        (M::CBar, K::MmcInf | K::Mminf) => r"\bar{c} = \lambda/\mu",
        (M::CBar, K::MmcN) => r"\bar{c} = L_s - L_q",
        (M::CBar, K::MmrRepair) => r"\bar{c} = \sum_{n=0}^{K} \min(n,R) p_n",
    }
}

/// Display-math formula for `metric` under `kind`.
#[must_use]
pub fn formula(metric: Metric, kind: ModelKind) -> String {
    format!("$${}$$", latex(metric, kind))
}

/// Formula for a metric given by key or label, e.g. `"Ls"` or `"λeff"`.
///
/// Unknown names yield the [`NOT_AVAILABLE`] placeholder.
#[must_use]
pub fn formula_by_name(name: &str, kind: ModelKind) -> String {
    Metric::parse(name).map_or_else(
        |_| format!("$${NOT_AVAILABLE}$$"),
        |metric| formula(metric, kind),
    )
}

/// Inline-math title for a formula view, e.g. `\(\bar{c}\) formula`.
#[must_use]
pub fn title(metric: Metric) -> String {
    format!(r"\({}\) formula", metric.latex())
}
