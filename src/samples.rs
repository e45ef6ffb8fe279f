// Bundled sample C programs and pass sequences for trying the service
// without a source file at hand

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleProgram {
    pub name: &'static str,
    pub file_name: &'static str,
    pub code: &'static str,
}

const SIMPLE_LOOP: &str = r#"#include <stdio.h>

int main() {
    int sum = 0;
    for (int i = 0; i < 1000; i++) {
        sum += i;
    }
    printf("Sum: %d\n", sum);
    return 0;
}"#;

const MATRIX_MULTIPLY: &str = r#"#include <stdio.h>

#define N 10

int main() {
    int a[N][N], b[N][N], c[N][N];

    // Initialize matrices
    for (int i = 0; i < N; i++) {
        for (int j = 0; j < N; j++) {
            a[i][j] = i + j;
            b[i][j] = i - j;
            c[i][j] = 0;
        }
    }

    // Matrix multiplication
    for (int i = 0; i < N; i++) {
        for (int j = 0; j < N; j++) {
            for (int k = 0; k < N; k++) {
                c[i][j] += a[i][k] * b[k][j];
            }
        }
    }

    printf("Result: %d\n", c[N-1][N-1]);
    return 0;
}"#;

const FIBONACCI: &str = r#"#include <stdio.h>

int fibonacci(int n) {
    if (n <= 1) return n;
    return fibonacci(n - 1) + fibonacci(n - 2);
}

int main() {
    int n = 20;
    int result = fibonacci(n);
    printf("Fibonacci(%d) = %d\n", n, result);
    return 0;
}"#;

pub fn sample_programs() -> Vec<SampleProgram> {
    vec![
        SampleProgram {
            name: "Simple Loop",
            file_name: "simple_loop.c",
            code: SIMPLE_LOOP,
        },
        SampleProgram {
            name: "Matrix Multiply",
            file_name: "matrix_multiply.c",
            code: MATRIX_MULTIPLY,
        },
        SampleProgram {
            name: "Fibonacci",
            file_name: "fibonacci.c",
            code: FIBONACCI,
        },
    ]
}

/// Case-insensitive lookup by display name or file name
pub fn find_sample(name: &str) -> Option<SampleProgram> {
    let wanted = name.to_lowercase();
    sample_programs().into_iter().find(|program| {
        program.name.to_lowercase() == wanted || program.file_name.to_lowercase() == wanted
    })
}

/// Pass sequence sent when the ML predictor is disabled and the caller
/// provided none
pub fn default_manual_passes() -> Vec<String> {
    vec![
        "mem2reg".to_string(),
        "simplifycfg".to_string(),
        "instcombine".to_string(),
    ]
}

/// Example pass sequences of increasing aggressiveness
pub fn example_pass_sequences() -> Vec<Vec<&'static str>> {
    vec![
        vec!["mem2reg", "simplifycfg", "instcombine"],
        vec![
            "mem2reg",
            "loop-simplify",
            "loop-rotate",
            "licm",
            "loop-unroll",
            "simplifycfg",
        ],
        vec![
            "mem2reg",
            "gvn",
            "simplifycfg",
            "instcombine",
            "loop-simplify",
            "loop-rotate",
            "licm",
            "loop-unroll",
            "sccp",
            "dce",
            "simplifycfg",
        ],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_lookup() {
        assert!(find_sample("fibonacci").is_some());
        assert!(find_sample("Simple Loop").is_some());
        assert!(find_sample("simple_loop.c").is_some());
        assert!(find_sample("quicksort").is_none());
    }

    #[test]
    fn test_samples_are_compilable_shapes() {
        for program in sample_programs() {
            assert!(program.code.contains("int main()"), "{}", program.name);
        }
    }
}
