use crate::io::ConfigurablePrintTarget;
use crate::algebra::*;
use itertools::Itertools;
use std::io::Write;

use super::*;
use crate::solver::core::traits::InfoPrint;
use std::time::Duration;

impl<T> ConfigurablePrintTarget for DefaultInfo<T> {
    fn print_to_stdout(&mut self) {
        self.stream.print_to_stdout()
    }
    fn print_to_file(&mut self, file: std::fs::File) {
        self.stream.print_to_file(file)
    }
    fn print_to_stream(&mut self, stream: Box<dyn Write + Send + Sync>) {
        self.stream.print_to_stream(stream)
    }
    fn print_to_sink(&mut self) {
        self.stream.print_to_sink()
    }
    fn print_to_buffer(&mut self) {
        self.stream.print_to_buffer()
    }
    fn get_print_buffer(&mut self) -> std::io::Result<String> {
        self.stream.get_print_buffer()
    }
}

macro_rules! expformat {
    ($fmt:expr,$val:expr) => {
        if $val.is_finite() {
            _exp_str_reformat(format!($fmt, $val))
        } else {
            format!($fmt, $val)
        }
    };
}

const RULE: &str = "------------------------------------------------------------------";

impl<T> InfoPrint<T> for DefaultInfo<T>
where
    T: FloatT,
{
    type D = DefaultProblemData<T>;
    type SE = DefaultSettings<T>;

    fn print_configuration(
        &mut self,
        settings: &DefaultSettings<T>,
        data: &DefaultProblemData<T>,
    ) -> std::io::Result<()> {
        if !settings.verbose {
            return std::io::Result::Ok(());
        }

        let out = &mut self.stream;

        writeln!(out, "\nproblem:")?;
        writeln!(out, "  variables     = {}", data.n)?;
        writeln!(out, "  inequalities  = {}", data.m)?;
        writeln!(out, "  equalities    = {}", data.neq)?;

        let eq = &data.equalities;
        if !eq.dropped.is_empty() {
            writeln!(
                out,
                "  dropped {} redundant equalities: {}",
                eq.dropped.len(),
                _index_list(&eq.dropped)
            )?;
        }
        if !eq.inconsistent.is_empty() {
            writeln!(
                out,
                "  inconsistent equalities: {}",
                _index_list(&eq.inconsistent)
            )?;
        }

        writeln!(out,)?;

        self.print_settings(settings)?;

        std::io::Result::Ok(())
    }

    fn print_status_header(&mut self, settings: &DefaultSettings<T>) -> std::io::Result<()> {
        if !settings.verbose {
            return std::io::Result::Ok(());
        }

        let out = &mut self.stream;

        //print a subheader for the iterations info
        write!(out, "ph  ")?;
        write!(out, "iter    ")?;
        write!(out, "objective     ")?;
        write!(out, "max viol    ")?;
        write!(out, "|W|   ")?;
        write!(out, "step      ")?;
        write!(out, "action")?;
        writeln!(out,)?;
        writeln!(out, "{RULE}")?;
        out.flush()?;
        std::io::Result::Ok(())
    }

    fn print_status(&mut self, settings: &DefaultSettings<T>) -> std::io::Result<()> {
        if !settings.verbose {
            return std::io::Result::Ok(());
        }

        let out = &mut self.stream;

        write!(out, "{:>2}  ", self.phase)?;
        write!(out, "{:>4}  ", self.iterations)?;
        write!(out, "{}  ", expformat!("{:+10.4e}", self.objective))?;
        write!(out, "{}  ", expformat!("{:8.2e}", self.max_violation))?;
        write!(out, "{:>3}  ", self.working_set_size)?;

        if self.step_length.is_finite() {
            write!(out, "{}  ", expformat!("{:8.2e}", self.step_length))?;
        } else {
            write!(out, " ------   ")?;
        }
        write!(out, "{}", self.action)?;

        writeln!(out,)?;

        std::io::Result::Ok(())
    }

    fn print_footer(&mut self, settings: &DefaultSettings<T>) -> std::io::Result<()> {
        if !settings.verbose {
            return std::io::Result::Ok(());
        }

        let out = &mut self.stream;

        writeln!(out, "{RULE}")?;

        writeln!(out, "Terminated with status = {}", self.status)?;
        writeln!(
            out,
            "iterations = {} (phase one {})",
            self.iterations, self.phase_one_iterations
        )?;
        if self.status.has_objective() {
            writeln!(out, "objective  = {}", expformat!("{:+.6e}", self.objective))?;
        }

        writeln!(
            out,
            "solve time = {:?}",
            Duration::from_secs_f64(self.solve_time)
        )?;
        out.flush()?;

        std::io::Result::Ok(())
    }

    fn print_target(&mut self) -> &mut dyn std::io::Write {
        &mut self.stream
    }
}

impl<T> DefaultInfo<T>
where
    T: FloatT,
{
    fn print_settings(&mut self, settings: &DefaultSettings<T>) -> std::io::Result<()> {
        let out = &mut self.stream;

        let set = settings;

        writeln!(out, "settings:")?;

        write!(out, "  linear algebra: dense LU / null space fallback, ")?;
        writeln!(out, "precision: {} bit", _get_precision_string::<T>())?;

        let max_iter_str = match set.max_iter {
            Some(k) => k.to_string(),
            None => "auto".to_string(),
        };
        writeln!(out, "  max iter = {}, tol = {:.1e}", max_iter_str, set.tol)?;

        writeln!(
            out,
            "  initial point: {}, strict symmetry: {}",
            _bool_on_off(set.initial_point.is_some()),
            _bool_on_off(set.strict_symmetry)
        )?;

        writeln!(out,)?;

        std::io::Result::Ok(())
    }
}

fn _bool_on_off(v: bool) -> &'static str {
    match v {
        true => "on",
        false => "off",
    }
}

fn _get_precision_string<T: FloatT>() -> String {
    (::std::mem::size_of::<T>() * 8).to_string()
}

// at most five indices, then an ellipsis and the last one
fn _index_list(idx: &[usize]) -> String {
    let maxlistlen = 5;
    if idx.len() <= maxlistlen {
        format!("({})", idx.iter().join(","))
    } else {
        format!(
            "({},...,{})",
            idx[..maxlistlen - 1].iter().join(","),
            idx[idx.len() - 1]
        )
    }
}

// convert a string in LowerExp display format into one that
// 1) always has a sign after the exponent, and
// 2) has at least two digits in the exponent.

fn _exp_str_reformat(mut thestr: String) -> String {
    let Some(eidx) = thestr.find('e') else {
        return thestr;
    };
    let has_sign = thestr[eidx + 1..].starts_with('-');

    let has_short_exp = {
        if !has_sign {
            thestr.len() == eidx + 2
        } else {
            thestr.len() == eidx + 3
        }
    };

    let chars = match (has_sign, has_short_exp) {
        (false, true) => "+0",
        (false, false) => "+",
        (true, true) => "0",
        (true, false) => "",
    };

    let shift = if has_sign { 2 } else { 1 };
    thestr.insert_str(eidx + shift, chars);
    thestr
}

#[test]
fn test_exp_str_reformat() {
    assert_eq!(_exp_str_reformat(format!("{:.2e}", 1.5)), "1.50e+00");
    assert_eq!(_exp_str_reformat(format!("{:.2e}", 0.015)), "1.50e-02");
    assert_eq!(_exp_str_reformat(format!("{:.1e}", 2e-120)), "2.0e-120");
    assert_eq!(_exp_str_reformat("nan".to_string()), "nan");
}

#[test]
fn test_index_list() {
    assert_eq!(_index_list(&[3]), "(3)");
    assert_eq!(_index_list(&[0, 1, 2, 3, 4]), "(0,1,2,3,4)");
    assert_eq!(_index_list(&[0, 1, 2, 3, 4, 5, 9]), "(0,1,2,3,...,9)");
}
