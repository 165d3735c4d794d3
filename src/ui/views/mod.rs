pub mod classroom_create;
pub mod classroom_join;
pub mod classroom_view;
pub mod classrooms;
pub mod dashboard;
pub mod login;
pub mod quiz;
pub mod quiz_list;
pub mod reset;
pub mod results;
pub mod signup;
