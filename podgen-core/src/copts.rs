//! Compiler option tables for Abseil and their generated CMake / Bazel forms.
//!
//! The flag lists here are the source of truth; `podgen copts` regenerates
//! `GENERATED_AbseilCopts.cmake` and `GENERATED_copts.bzl` from them.

// /Wall with msvc includes unhelpful warnings such as C4711, C4710, ...
const MSVC_BIG_WARNING_FLAGS: &[&str] = &["/W3"];

const LLVM_BIG_WARNING_FLAGS: &[&str] = &["-Wall", "-Wextra", "-Weverything"];

const LLVM_DISABLE_WARNINGS_FLAGS: &[&str] = &[
    // No C++98 support.
    "-Wno-c++98-compat-pedantic",
    // Turns off all implicit conversion warnings; most are re-enabled below.
    "-Wno-conversion",
    "-Wno-covered-switch-default",
    "-Wno-deprecated",
    "-Wno-disabled-macro-expansion",
    "-Wno-double-promotion",
    // These fire on valid C++.
    "-Wno-comma",
    "-Wno-extra-semi",
    "-Wno-extra-semi-stmt",
    "-Wno-packed",
    "-Wno-padded",
    "-Wno-sign-compare",
    "-Wno-float-conversion",
    "-Wno-float-equal",
    "-Wno-format-nonliteral",
    // Fires on Clang extensions inside Clang-only code paths.
    "-Wno-gcc-compat",
    "-Wno-global-constructors",
    "-Wno-exit-time-destructors",
    "-Wno-nested-anon-types",
    "-Wno-non-modular-include-in-module",
    "-Wno-old-style-cast",
    // Warns on preferred usage of non-POD types such as string_view.
    "-Wno-range-loop-analysis",
    "-Wno-reserved-id-macro",
    "-Wno-shorten-64-to-32",
    "-Wno-switch-enum",
    "-Wno-thread-safety-negative",
    "-Wno-undef",
    "-Wno-unknown-warning-option",
    "-Wno-unreachable-code",
    // Fires on include guards.
    "-Wno-unused-macros",
    "-Wno-weak-vtables",
    // Conversion warnings re-enabled after -Wno-conversion.
    "-Wbitfield-enum-conversion",
    "-Wbool-conversion",
    "-Wconstant-conversion",
    "-Wenum-conversion",
    "-Wint-conversion",
    "-Wliteral-conversion",
    "-Wnon-literal-null-conversion",
    "-Wnull-conversion",
    "-Wobjc-literal-conversion",
    "-Wno-sign-conversion",
    "-Wstring-conversion",
];

const LLVM_TEST_DISABLE_WARNINGS_FLAGS: &[&str] = &[
    "-Wno-c99-extensions",
    "-Wno-missing-noreturn",
    "-Wno-missing-prototypes",
    "-Wno-missing-variable-declarations",
    "-Wno-null-conversion",
    "-Wno-shadow",
    "-Wno-shift-sign-overflow",
    "-Wno-sign-compare",
    "-Wno-unused-function",
    "-Wno-unused-member-function",
    "-Wno-unused-parameter",
    "-Wno-unused-private-field",
    "-Wno-unused-template",
    "-Wno-used-but-marked-unused",
    "-Wno-zero-as-null-pointer-constant",
    // libc++ bug fixed in r357267.
    "-Wno-gnu-include-next",
    // gtest relies on this GNU extension.
    "-Wno-gnu-zero-variadic-macro-arguments",
];

const MSVC_STYLE_EXCEPTIONS_FLAGS: &[&str] = &["/U_HAS_EXCEPTIONS", "/D_HAS_EXCEPTIONS=1", "/EHsc"];

const MSVC_DEFINES: &[&str] = &[
    // windows.h min/max macros
    "/DNOMINMAX",
    "/DWIN32_LEAN_AND_MEAN",
    "/D_CRT_SECURE_NO_WARNINGS",
    "/D_SCL_SECURE_NO_WARNINGS",
    // VS 2017 15.8+: overaligned types in aligned_storage
    "/D_ENABLE_EXTENDED_ALIGNED_STORAGE",
];

const GCC_FLAGS: &[&str] = &[
    "-Wall",
    "-Wextra",
    "-Wcast-qual",
    "-Wconversion-null",
    "-Wmissing-declarations",
    "-Woverlength-strings",
    "-Wpointer-arith",
    "-Wunused-local-typedefs",
    "-Wunused-result",
    "-Wvarargs",
    "-Wvla",
    "-Wwrite-strings",
    // gcc-4.x: spurious missing field initializer warnings (GCC bug 36750).
    "-Wno-missing-field-initializers",
    "-Wno-sign-compare",
];

const GCC_TEST_FLAGS: &[&str] = &[
    "-Wno-conversion-null",
    "-Wno-missing-declarations",
    "-Wno-sign-compare",
    "-Wno-unused-function",
    "-Wno-unused-parameter",
    "-Wno-unused-private-field",
];

const EXCEPTIONS_FLAGS: &[&str] = &["-fexceptions"];

const MSVC_EXTRA_FLAGS: &[&str] = &[
    "/wd4005", // macro-redefinition
    "/wd4068", // unknown pragma
    "/wd4180", // qualifier applied to function type has no meaning
    "/wd4244", // possible loss of data
    "/wd4267", // size_t conversion, possible loss of data
    "/wd4800", // forcing value to bool
];

const MSVC_TEST_FLAGS: &[&str] = &[
    "/wd4018", // signed/unsigned mismatch
    "/wd4101", // unreferenced local variable
    "/wd4503", // decorated name length exceeded
    "/DNOMINMAX",
];

const MSVC_LINKOPTS: &[&str] = &[
    // Object file doesn't export any previously undefined symbols
    "-ignore:4221",
];

/// A named, ordered list of compiler or linker flags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoptGroup {
    pub name: &'static str,
    pub flags: Vec<&'static str>,
}

impl CoptGroup {
    fn new(name: &'static str, parts: &[&[&'static str]]) -> Self {
        Self {
            name,
            flags: parts.concat(),
        }
    }
}

/// Every flag group, sorted by name.
pub fn copt_groups() -> Vec<CoptGroup> {
    let mut groups = vec![
        CoptGroup::new("ABSL_GCC_FLAGS", &[GCC_FLAGS]),
        CoptGroup::new("ABSL_GCC_TEST_FLAGS", &[GCC_TEST_FLAGS]),
        CoptGroup::new("ABSL_GCC_EXCEPTIONS_FLAGS", &[EXCEPTIONS_FLAGS]),
        CoptGroup::new(
            "ABSL_LLVM_FLAGS",
            &[LLVM_BIG_WARNING_FLAGS, LLVM_DISABLE_WARNINGS_FLAGS],
        ),
        CoptGroup::new("ABSL_LLVM_TEST_FLAGS", &[LLVM_TEST_DISABLE_WARNINGS_FLAGS]),
        CoptGroup::new("ABSL_LLVM_EXCEPTIONS_FLAGS", &[EXCEPTIONS_FLAGS]),
        CoptGroup::new(
            "ABSL_CLANG_CL_FLAGS",
            &[MSVC_BIG_WARNING_FLAGS, LLVM_DISABLE_WARNINGS_FLAGS, MSVC_DEFINES],
        ),
        CoptGroup::new("ABSL_CLANG_CL_TEST_FLAGS", &[LLVM_TEST_DISABLE_WARNINGS_FLAGS]),
        CoptGroup::new("ABSL_CLANG_CL_EXCEPTIONS_FLAGS", &[MSVC_STYLE_EXCEPTIONS_FLAGS]),
        CoptGroup::new(
            "ABSL_MSVC_FLAGS",
            &[MSVC_BIG_WARNING_FLAGS, MSVC_DEFINES, MSVC_EXTRA_FLAGS],
        ),
        CoptGroup::new("ABSL_MSVC_TEST_FLAGS", &[MSVC_TEST_FLAGS]),
        CoptGroup::new("ABSL_MSVC_EXCEPTIONS_FLAGS", &[MSVC_STYLE_EXCEPTIONS_FLAGS]),
        CoptGroup::new("ABSL_MSVC_LINKOPTS", &[MSVC_LINKOPTS]),
    ];
    groups.sort_by(|a, b| a.name.cmp(b.name));
    groups
}

/// Output flavour of the generated flag file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoptStyle {
    Cmake,
    Bazel,
}

impl CoptStyle {
    pub fn default_file_name(&self) -> &'static str {
        match self {
            CoptStyle::Cmake => "GENERATED_AbseilCopts.cmake",
            CoptStyle::Bazel => "GENERATED_copts.bzl",
        }
    }
}

const GENERATED_NOTICE: [&str; 4] = [
    "GENERATED! DO NOT MANUALLY EDIT THIS FILE.",
    "",
    "(1) Edit the flag tables in podgen-core/src/copts.rs.",
    "(2) Run `podgen copts --style <cmake|bazel>`.",
];

/// Render every flag group in `style`.
pub fn render_copts(style: CoptStyle) -> String {
    let mut out = String::new();

    match style {
        CoptStyle::Cmake => {
            for line in GENERATED_NOTICE {
                if line.is_empty() {
                    out.push_str("#\n");
                } else {
                    out.push_str(&format!("# {}\n", line));
                }
            }
        }
        CoptStyle::Bazel => {
            out.push_str("\"\"\"");
            out.push_str(&GENERATED_NOTICE.join("\n"));
            out.push_str("\n\"\"\"\n");
        }
    }

    for group in copt_groups() {
        out.push('\n');
        match style {
            CoptStyle::Cmake => {
                out.push_str(&format!("list(APPEND {}\n", group.name));
                for flag in &group.flags {
                    out.push_str(&format!("    \"{}\"\n", flag));
                }
                out.push_str(")\n");
            }
            CoptStyle::Bazel => {
                out.push_str(&format!("{} = [\n", group.name));
                for flag in &group.flags {
                    out.push_str(&format!("    \"{}\",\n", flag));
                }
                out.push_str("]\n");
            }
        }
    }

    out
}
