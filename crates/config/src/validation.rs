use inno_errors::{InnoError, InnoResult};

pub trait ConfigValidator {
    fn validate(&self) -> InnoResult<()>;
}

pub struct ValidationUtils;

impl ValidationUtils {
    pub fn validate_not_empty(value: &str, field_name: &str) -> InnoResult<()> {
        if value.trim().is_empty() {
            return Err(InnoError::config_error(format!(
                "{field_name} cannot be empty"
            )));
        }
        Ok(())
    }

    pub fn validate_port(port: u16, field_name: &str) -> InnoResult<()> {
        if port == 0 {
            return Err(InnoError::config_error(format!("{field_name} cannot be 0")));
        }
        Ok(())
    }

    pub fn validate_count(count: usize, field_name: &str, max: usize) -> InnoResult<()> {
        if count == 0 {
            return Err(InnoError::config_error(format!(
                "{field_name} must be greater than 0"
            )));
        }
        if count > max {
            return Err(InnoError::config_error(format!(
                "{field_name} must be less than or equal to {max}"
            )));
        }
        Ok(())
    }
}
