mod brew;
mod helpers;
mod recipe;
mod settings;
mod transfer;

pub(crate) use brew::cmd_brew;
pub(crate) use recipe::{
    RecipeFields, cmd_delete, cmd_duplicate, cmd_edit, cmd_list, cmd_new, cmd_show,
};
pub(crate) use settings::{
    Switch, cmd_config_locale, cmd_config_show, cmd_config_sound, cmd_config_vibration,
};
pub(crate) use transfer::{cmd_export, cmd_import, cmd_reset};
